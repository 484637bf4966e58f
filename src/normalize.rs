//! Icon normalization: pull `defs`, `title` and `desc` out of an icon and
//! flatten its top-level groups, leaving the content that goes into a symbol.

use crate::ast::*;
use crate::error::SvgstoreError;
use crate::serialize::serialize_nodes;

/// The parts of one icon, ready to be wrapped in a `<symbol>`.
#[derive(Debug, Clone, Default)]
pub struct NormalizedIcon {
    /// Content of the icon's first `<defs>`, merged into the sprite's `<defs>`
    pub defs: Vec<Node>,
    /// Content of the first `<title>`
    pub title: Option<Vec<Node>>,
    /// Content of the first `<desc>`
    pub desc: Option<Vec<Node>>,
    /// The root's `viewBox` attribute
    pub view_box: Option<String>,
    /// Everything else under the root
    pub body: Vec<Node>,
}

impl NormalizedIcon {
    pub fn defs_markup(&self) -> String {
        serialize_nodes(&self.defs)
    }

    pub fn body_markup(&self) -> String {
        serialize_nodes(&self.body)
    }
}

/// Split a rewritten icon document into its parts.
///
/// The order matters: `defs` is removed before `title`/`desc` are looked up,
/// so titles inside a `defs` block travel with the defs.
pub fn normalize(doc: Document) -> Result<NormalizedIcon, SvgstoreError> {
    let mut svg = doc.root;
    if !svg.is("svg") {
        return Err(SvgstoreError::InvalidSvg(format!(
            "root element is <{}>, expected <svg>",
            svg.name.full_name()
        )));
    }

    let defs = svg
        .take_first_descendant("defs")
        .map(|d| d.children)
        .filter(|children| !children.iter().all(Node::is_whitespace))
        .unwrap_or_default();

    // Every title/desc goes; only the first one's content is kept
    let title = svg.take_descendants("title").into_iter().next().map(|t| t.children);
    let desc = svg.take_descendants("desc").into_iter().next().map(|d| d.children);

    unwrap_groups(&mut svg);

    let view_box = svg.get_attr("viewBox").map(str::to_string);

    let mut body = std::mem::take(&mut svg.children);
    strip_control_whitespace(&mut body);

    Ok(NormalizedIcon {
        defs,
        title,
        desc,
        view_box,
        body,
    })
}

/// Replace each direct `<g>` child with its own children. Deeper groups stay.
fn unwrap_groups(svg: &mut Element) {
    let mut new_children = Vec::with_capacity(svg.children.len());

    for child in std::mem::take(&mut svg.children) {
        match child {
            Node::Element(g) if g.is("g") => new_children.extend(g.children),
            other => new_children.push(other),
        }
    }

    svg.children = new_children;
}

/// Remove CR, LF and tab from text, trimming the fragment's outer edges.
/// Inside attribute values they become spaces so number lists stay apart.
fn strip_control_whitespace(nodes: &mut Vec<Node>) {
    fn is_control(c: char) -> bool {
        matches!(c, '\r' | '\n' | '\t')
    }

    fn visit(elem: &mut Element) {
        for attr in &mut elem.attributes {
            if attr.value.contains(is_control) {
                attr.value = attr.value.replace(is_control, " ");
            }
        }
        for child in &mut elem.children {
            match child {
                Node::Element(e) => visit(e),
                Node::Text(t) if t.contains(is_control) => t.retain(|c| !is_control(c)),
                _ => {}
            }
        }
    }

    for node in nodes.iter_mut() {
        match node {
            Node::Element(e) => visit(e),
            Node::Text(t) => t.retain(|c| !is_control(c)),
            _ => {}
        }
    }

    if let Some(Node::Text(t)) = nodes.first_mut() {
        *t = t.trim_start().to_string();
    }
    if let Some(Node::Text(t)) = nodes.last_mut() {
        *t = t.trim_end().to_string();
    }
    nodes.retain(|n| !matches!(n, Node::Text(t) if t.is_empty()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_svg;

    fn normalized(svg: &str) -> NormalizedIcon {
        normalize(parse_svg(svg).unwrap()).unwrap()
    }

    #[test]
    fn test_plain_icon_body_is_unchanged() {
        let icon = normalized(
            r#"<svg viewBox="0 0 10 10">
                <rect x="1" y="1" width="8" height="8"/>
                <circle cx="5" cy="5" r="2"/>
            </svg>"#,
        );
        assert_eq!(icon.view_box.as_deref(), Some("0 0 10 10"));
        assert_eq!(
            icon.body_markup(),
            r#"<rect x="1" y="1" width="8" height="8"/><circle cx="5" cy="5" r="2"/>"#
        );
        assert!(icon.defs.is_empty());
        assert!(icon.title.is_none());
        assert!(icon.desc.is_none());
    }

    #[test]
    fn test_extracts_defs_title_desc() {
        let icon = normalized(
            r#"<svg>
                <title>Home</title>
                <desc>A house</desc>
                <defs><linearGradient id="g"/></defs>
                <path d="M0 0"/>
            </svg>"#,
        );
        assert_eq!(icon.defs_markup(), r#"<linearGradient id="g"/>"#);
        assert_eq!(serialize_nodes(icon.title.as_deref().unwrap()), "Home");
        assert_eq!(serialize_nodes(icon.desc.as_deref().unwrap()), "A house");
        assert_eq!(icon.body_markup(), r#"<path d="M0 0"/>"#);
    }

    #[test]
    fn test_empty_defs_is_removed_but_not_kept() {
        let icon = normalized("<svg><defs> </defs><path/></svg>");
        assert!(icon.defs.is_empty());
        assert_eq!(icon.body_markup(), "<path/>");
    }

    #[test]
    fn test_only_first_defs_is_taken() {
        let icon = normalized("<svg><defs><a/></defs><defs><b/></defs></svg>");
        assert_eq!(icon.defs_markup(), "<a/>");
        assert_eq!(icon.body_markup(), "<defs><b/></defs>");
    }

    #[test]
    fn test_all_titles_are_removed() {
        let icon = normalized("<svg><title>One</title><g><title>Two</title><path/></g></svg>");
        assert_eq!(serialize_nodes(icon.title.as_deref().unwrap()), "One");
        assert_eq!(icon.body_markup(), "<path/>");
    }

    #[test]
    fn test_unwraps_one_level_of_groups() {
        let icon = normalized(
            r#"<svg><g fill="red"><path d="M1"/><g id="inner"><path d="M2"/></g></g><rect/></svg>"#,
        );
        assert_eq!(
            icon.body_markup(),
            r#"<path d="M1"/><g id="inner"><path d="M2"/></g><rect/>"#
        );
    }

    #[test]
    fn test_control_characters_are_stripped() {
        let icon = normalized("<svg><path d=\"M0\n0\tL1\r\n1\"/></svg>");
        assert_eq!(icon.body_markup(), r#"<path d="M0 0 L1  1"/>"#);
    }

    #[test]
    fn test_non_svg_root_is_an_error() {
        let err = normalize(parse_svg("<html><body/></html>").unwrap()).unwrap_err();
        assert!(matches!(err, SvgstoreError::InvalidSvg(_)));
    }
}
