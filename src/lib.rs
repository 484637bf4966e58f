//! svgstore - merge SVG icons into a symbol sprite
//!
//! Each source icon becomes a `<symbol>` addressable by id. Ids inside an icon
//! are namespaced per file so icons can never clash, and an optional HTML demo
//! page references every symbol through `<use>`.

mod ast;
mod config;
mod demo;
mod error;
mod job;
mod normalize;
mod parse;
mod rewrite;
mod serialize;
mod sprite;
mod symbol;

pub use ast::*;
pub use config::*;
pub use demo::*;
pub use error::*;
pub use job::*;
pub use normalize::*;
pub use parse::*;
pub use rewrite::*;
pub use serialize::*;
pub use sprite::*;
pub use symbol::*;

/// Merge `(base id, svg text)` pairs into sprite markup.
pub fn build_sprite<'s>(
    icons: impl IntoIterator<Item = (&'s str, &'s str)>,
    options: &Options,
) -> Result<String, SvgstoreError> {
    let mut builder = SpriteBuilder::new(options);
    for (id, content) in icons {
        builder.add_icon(id, content)?;
    }
    builder.finish().to_svg()
}
