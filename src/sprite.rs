//! Sprite assembly.
//!
//! A [`SpriteBuilder`] accepts icons one at a time, in order. Calling
//! [`SpriteBuilder::finish`] consumes it and yields a [`Sprite`] that can
//! only be rendered.

use tracing::debug;

use crate::ast::*;
use crate::config::Options;
use crate::error::SvgstoreError;
use crate::normalize::normalize;
use crate::parse::parse_svg;
use crate::rewrite::{fingerprint, rewrite_ids};
use crate::serialize::finalize;
use crate::symbol::build_symbol;

/// Inline style that keeps the sprite out of the demo page's layout.
pub const HIDDEN_STYLE: &str = "width:0;height:0;visibility:hidden;";

/// A sprite under construction.
#[derive(Debug)]
pub struct SpriteBuilder<'a> {
    options: &'a Options,
    root: Element,
    defs: Element,
    icons: Vec<String>,
}

impl<'a> SpriteBuilder<'a> {
    pub fn new(options: &'a Options) -> Self {
        let mut root = Element::new("svg");
        for (name, value) in &options.svg {
            root.set_attr(name, value.as_str());
        }

        Self {
            options,
            root,
            defs: Element::new("defs"),
            icons: Vec::new(),
        }
    }

    /// Parse one icon and append it as a symbol.
    ///
    /// `base_id` is the icon's id before the prefix, usually from
    /// [`icon_id_from_path`](crate::icon_id_from_path). Returns the symbol's
    /// public id. A parse error leaves the builder untouched.
    pub fn add_icon(&mut self, base_id: &str, content: &str) -> Result<&str, SvgstoreError> {
        let mut doc = parse_svg(content)?;
        let ids = rewrite_ids(&mut doc.root, &fingerprint(content), self.options.cleanup);
        let mut icon = normalize(doc)?;

        self.defs.children.append(&mut icon.defs);

        let symbol = build_symbol(icon, base_id, self.options);
        debug!(id = %symbol.id, rewritten_ids = ids.len(), "added symbol");

        let container = if self.options.insert_into_defs {
            &mut self.defs
        } else {
            &mut self.root
        };
        container.append_child(Node::Element(symbol.element));

        self.icons.push(symbol.id);
        Ok(self.icons.last().map(String::as_str).unwrap_or_default())
    }

    /// Ids of the symbols added so far, in order.
    pub fn icons(&self) -> &[String] {
        &self.icons
    }

    /// Close the sprite. An empty `<defs>` is dropped.
    pub fn finish(self) -> Sprite<'a> {
        let mut root = self.root;
        if !self.defs.is_blank() {
            root.prepend_child(Node::Element(self.defs));
        }

        Sprite {
            options: self.options,
            document: Document { root },
            icons: self.icons,
        }
    }
}

/// A finished sprite.
#[derive(Debug)]
pub struct Sprite<'a> {
    options: &'a Options,
    document: Document,
    icons: Vec<String>,
}

impl Sprite<'_> {
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Public ids of every symbol, in processing order.
    pub fn icons(&self) -> &[String] {
        &self.icons
    }

    /// The sprite file's content.
    pub fn to_svg(&self) -> Result<String, SvgstoreError> {
        finalize(&self.document, self.options)
    }

    /// The sprite as embedded in the demo page: hidden from layout.
    pub fn demo_markup(&self) -> Result<String, SvgstoreError> {
        let mut hidden = self.document.clone();
        hidden.root.set_attr("style", HIDDEN_STYLE);
        finalize(&hidden, self.options)
    }
}
