//! HTML demo page listing every symbol of a sprite.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::config::Options;
use crate::error::SvgstoreError;
use crate::serialize::pretty_print;
use crate::sprite::Sprite;

/// Built-in template, used when no `demoTemplate` is configured or the
/// configured file does not exist.
pub const DEFAULT_TEMPLATE: &str = r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>{{title}}</title>
    <style>
      svg{
          width:50px;
          height:50px;
          fill:black !important;
      }
    </style>
  </head>
  <body>
    {{svg}}
    {{useBlock}}
  </body>
</html>
"#;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(svg|useBlock|svgFilename|title)\}\}").expect("placeholder pattern is valid")
});

/// One `<svg><use/></svg>` line per icon, in order.
pub fn use_block(icons: &[String]) -> String {
    icons
        .iter()
        .map(|id| format!("<svg class=\"{id}\"><use xlink:href=\"#{id}\"></use></svg>\n"))
        .collect()
}

/// Sprite filename without its `.svg` extension.
pub fn dest_base_name(dest: &Path) -> String {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(".svg") {
        Some(base) => base.to_string(),
        None => name,
    }
}

/// `arrows` → `Arrows Demo`
pub fn default_title(dest_name: &str) -> String {
    let mut chars = dest_name.chars();
    match chars.next() {
        Some(first) => format!("{}{} Demo", first.to_uppercase(), chars.as_str()),
        None => " Demo".to_string(),
    }
}

/// Where the demo page for `dest` is written.
pub fn demo_path(dest: &Path, options: &Options) -> PathBuf {
    let name = dest_base_name(dest);
    if options.demo_location.is_empty() {
        let dir = dest.parent().unwrap_or_else(|| Path::new(""));
        dir.join(format!("{name}-demo.html"))
    } else {
        Path::new(&options.demo_location).join(format!("{name}.html"))
    }
}

/// Read the configured template, or fall back to [`DEFAULT_TEMPLATE`].
pub fn load_template(options: &Options) -> Result<Cow<'static, str>, SvgstoreError> {
    if !options.demo_template.is_empty() {
        let path = Path::new(&options.demo_template);
        if path.is_file() {
            return Ok(Cow::Owned(fs::read_to_string(path)?));
        }
        debug!(template = %path.display(), "demo template not found, using the default");
    }
    Ok(Cow::Borrowed(DEFAULT_TEMPLATE))
}

/// Fill the template's placeholders.
///
/// `{{svg}}` and `{{useBlock}}` are replaced at their first occurrence,
/// `{{svgFilename}}` and `{{title}}` everywhere. All placeholders are
/// substituted in one pass over the template, so replacement text is never
/// scanned for further placeholders.
pub fn render_demo(
    template: &str,
    sprite_markup: &str,
    icons: &[String],
    dest_name: &str,
    demo_title: &str,
) -> String {
    let uses = use_block(icons);
    let title = if demo_title.is_empty() {
        default_title(dest_name)
    } else {
        demo_title.to_string()
    };

    let mut svg_done = false;
    let mut uses_done = false;
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "svg" if !svg_done => {
                svg_done = true;
                sprite_markup.to_string()
            }
            "useBlock" if !uses_done => {
                uses_done = true;
                uses.clone()
            }
            "svgFilename" => dest_name.to_string(),
            "title" => title.clone(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Build the demo page for a finished sprite written to `dest`.
pub fn build_demo(sprite: &Sprite<'_>, dest: &Path, options: &Options) -> Result<String, SvgstoreError> {
    let template = load_template(options)?;
    let html = render_demo(
        &template,
        &sprite.demo_markup()?,
        sprite.icons(),
        &dest_base_name(dest),
        &options.demo_title,
    );

    match &options.demo_formatting {
        Some(formatting) => match pretty_print(&html, formatting) {
            Ok(pretty) => Ok(pretty),
            Err(e) => {
                warn!(error = %e, "demo page could not be formatted, writing it as is");
                Ok(html)
            }
        },
        None => Ok(html),
    }
}
