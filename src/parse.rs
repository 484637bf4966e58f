//! SVG parsing from XML.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::ast::*;
use crate::error::SvgstoreError;

/// Parse an SVG string into a Document.
///
/// Whitespace runs inside text collapse to a single space. Whitespace-only
/// text is dropped, except between the children of a text-content element
/// where it becomes a single space. Anything but comments, PIs and
/// whitespace after the root element is an error.
pub fn parse_svg(svg: &str) -> Result<Document, SvgstoreError> {
    let mut reader = Reader::from_str(svg);

    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                root = Some(parse_element(&mut reader, &start)?);
                break;
            }
            Event::Empty(start) => {
                root = Some(parse_element_start(&start)?);
                break;
            }
            Event::Eof => break,
            // Declaration, DOCTYPE, comments, PIs and whitespace before the root
            _ => {}
        }
    }

    let root = root.ok_or_else(|| SvgstoreError::InvalidSvg("No root element found".into()))?;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => {}
            Event::Text(text) if text.unescape()?.trim().is_empty() => {}
            _ => {
                return Err(SvgstoreError::InvalidSvg(
                    "Content after root element".into(),
                ));
            }
        }
    }

    Ok(Document { root })
}

/// Elements whose whitespace between children is rendered.
const TEXT_CONTENT: &[&str] = &["text", "tspan", "textPath", "a", "title", "desc"];

fn parse_element(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Element, SvgstoreError> {
    let mut element = parse_element_start(start)?;
    let keep_spacing = TEXT_CONTENT.contains(&element.name.local.as_str());

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                element
                    .children
                    .push(Node::Element(parse_element(reader, &start)?));
            }
            Event::Empty(start) => {
                element
                    .children
                    .push(Node::Element(parse_element_start(&start)?));
            }
            Event::End(_) => {
                break;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                if !text.trim().is_empty() {
                    element.children.push(Node::Text(collapse_whitespace(&text)));
                } else if keep_spacing && !element.children.is_empty() {
                    element.children.push(Node::Text(" ".into()));
                }
            }
            Event::Comment(comment) => {
                element
                    .children
                    .push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
            }
            Event::CData(cdata) => {
                element
                    .children
                    .push(Node::CData(String::from_utf8_lossy(&cdata).into_owned()));
            }
            Event::PI(pi) => {
                let content = String::from_utf8_lossy(&pi).into_owned();
                let (target, rest) = content
                    .split_once(char::is_whitespace)
                    .map(|(t, r)| (t.to_string(), Some(r.to_string())))
                    .unwrap_or_else(|| (content, None));
                element
                    .children
                    .push(Node::ProcessingInstruction { target, content: rest });
            }
            Event::Eof => {
                return Err(SvgstoreError::InvalidSvg("Unexpected end of file".into()));
            }
            _ => {}
        }
    }

    // Spacing only counts between siblings
    if matches!(element.children.last(), Some(Node::Text(t)) if t == " ") {
        element.children.pop();
    }

    Ok(element)
}

fn parse_element_start(start: &BytesStart) -> Result<Element, SvgstoreError> {
    let name_bytes = start.name();
    let name = std::str::from_utf8(name_bytes.as_ref())?;

    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr =
            attr.map_err(|e| SvgstoreError::InvalidSvg(format!("Invalid attribute: {}", e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?;
        element.attributes.push(Attribute::new(key, value.into_owned()));
    }

    Ok(element)
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}
