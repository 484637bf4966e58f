//! SVG serialization and output fixups.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::Event;
use regex::Regex;

use crate::ast::*;
use crate::config::{Formatting, Options};
use crate::error::SvgstoreError;

/// Serialize a Document to compact markup.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    serialize_element(&mut out, &doc.root);
    out
}

/// Serialize a node list (an element's inner markup).
pub fn serialize_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        serialize_node(&mut out, node);
    }
    out
}

/// Serialize a document, expand the configured force-closed tags and
/// pretty-print if formatting is enabled.
pub fn finalize(doc: &Document, options: &Options) -> Result<String, SvgstoreError> {
    let markup = serialize(doc);
    let markup = force_close_tags(&markup, &options.force_close_tags)?;
    match &options.formatting {
        Some(formatting) => pretty_print(&markup, formatting),
        None => Ok(markup),
    }
}

pub(crate) fn serialize_element(out: &mut String, elem: &Element) {
    out.push('<');
    out.push_str(&elem.name.full_name());

    for attr in &elem.attributes {
        out.push(' ');
        out.push_str(&attr.name.full_name());
        out.push_str("=\"");
        push_escaped_attr(out, &attr.value);
        out.push('"');
    }

    // Children or self-closing
    if elem.children.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');

        for child in &elem.children {
            serialize_node(out, child);
        }

        out.push_str("</");
        out.push_str(&elem.name.full_name());
        out.push('>');
    }
}

fn serialize_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(elem) => serialize_element(out, elem),
        Node::Text(text) => push_escaped_text(out, text),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        Node::ProcessingInstruction { target, content } => {
            out.push_str("<?");
            out.push_str(target);
            if let Some(c) = content {
                out.push(' ');
                out.push_str(c);
            }
            out.push_str("?>");
        }
    }
}

fn push_escaped_attr(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_text(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Rewrite `<tag attrs/>` as `<tag attrs></tag>` for every listed tag name.
///
/// This is a text fixup on serialized markup, for consumers that mishandle
/// self-closing tags.
pub fn force_close_tags(markup: &str, tags: &[String]) -> Result<String, SvgstoreError> {
    let mut result = markup.to_string();
    for tag in tags {
        let re = Regex::new(&format!(r"<({})((?:\s[^>]*?)?)\s*/>", regex::escape(tag)))?;
        result = re.replace_all(&result, "<${1}${2}></${1}>").into_owned();
    }
    Ok(result)
}

/// Re-emit markup with one element per line, indented per `formatting`.
pub fn pretty_print(markup: &str, formatting: &Formatting) -> Result<String, SvgstoreError> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(true);
    // Demo templates are HTML and may leave void elements unclosed
    reader.config_mut().check_end_names = false;

    // The writer indents with a single byte
    let indent_char = if formatting.indent_char.is_ascii() {
        formatting.indent_char as u8
    } else {
        b' '
    };
    let mut writer = Writer::new_with_indent(Vec::new(), indent_char, formatting.indent_size);

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
    }

    let bytes = writer.into_inner();
    let text = String::from_utf8(bytes).map_err(|e| e.utf8_error())?;
    Ok(text)
}
