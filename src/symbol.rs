//! Wrapping a normalized icon into a `<symbol>`.

use std::path::Path;

use crate::ast::*;
use crate::config::Options;
use crate::normalize::NormalizedIcon;

/// One `<symbol>` for the sprite.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// Public id: `prefix + base id`
    pub id: String,
    pub element: Element,
}

/// Derive an icon's base id from its file path.
///
/// `icons/arrow-left.svg` → `arrow-left`; anything after a remaining dot is
/// dropped too, so `logo.v2.svg` → `logo`.
pub fn icon_id_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.split_once('.') {
        Some((head, _)) => head.to_string(),
        None => stem,
    }
}

/// Build the `<symbol>` for one icon.
///
/// The title falls back to `base_id` when the icon has none, so a symbol
/// always carries a title while `include_title` is on. `options.symbol`
/// attributes are applied before `viewBox` and `id`, which win on conflict.
pub fn build_symbol(icon: NormalizedIcon, base_id: &str, options: &Options) -> Symbol {
    let id = format!("{}{}", options.prefix, base_id);

    let mut element = Element::new("symbol");
    element.set_attr("id", id.as_str());

    for (name, value) in &options.symbol {
        element.set_attr(name, value.as_str());
    }

    if options.include_view_box
        && let Some(view_box) = &icon.view_box
    {
        element.set_attr("viewBox", view_box.as_str());
    }

    element.set_attr("id", id.as_str());

    element.children = icon.body;

    if options.include_desc
        && let Some(desc) = icon.desc
        && !desc.is_empty()
    {
        element.prepend_child(wrap("desc", desc));
    }

    if options.include_title {
        let title = icon
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| vec![Node::Text(base_id.to_string())]);
        element.prepend_child(wrap("title", title));
    }

    Symbol { id, element }
}

fn wrap(name: &str, children: Vec<Node>) -> Node {
    let mut element = Element::new(name);
    element.children = children;
    Node::Element(element)
}
