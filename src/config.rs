//! Option resolution.
//!
//! Options cascade through three tiers: built-in defaults, task-level
//! options, then target-level options. Each tier is a sparse TOML table
//! merged on top of the previous one; the result is deserialized exactly
//! once into an immutable [`Options`] value shared by the whole job.
//!
//! ```toml
//! [options]                       # task level
//! prefix = "icon-"
//! formatting = { indentSize = 2 }
//!
//! [targets.icons]
//! options = { insertIntoDefs = true }   # target level
//!
//! [[targets.icons.files]]
//! src = ["icons/*.svg"]
//! dest = "dist/icons.svg"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SvgstoreError;

/// Resolved sprite options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    /// Prepended to every symbol id
    pub prefix: String,
    /// Attributes applied to the root `<svg>`
    pub svg: BTreeMap<String, String>,
    /// Attributes applied to every `<symbol>`
    pub symbol: BTreeMap<String, String>,
    /// Pretty-print the sprite (`false` keeps it compact)
    #[serde(
        deserialize_with = "deserialize_formatting",
        skip_serializing_if = "Option::is_none"
    )]
    pub formatting: Option<Formatting>,
    /// Pretty-print the demo page
    #[serde(
        deserialize_with = "deserialize_formatting",
        skip_serializing_if = "Option::is_none"
    )]
    pub demo_formatting: Option<Formatting>,
    /// Write an HTML demo page next to the sprite
    #[serde(rename = "includedemo")]
    pub include_demo: bool,
    /// Tags whose self-closing form is expanded to an open/close pair
    pub force_close_tags: Vec<String>,
    pub include_desc: bool,
    pub include_title: bool,
    pub include_view_box: bool,
    /// Put symbols inside `<defs>` instead of directly under the root
    pub insert_into_defs: bool,
    /// Directory for the demo page (empty: next to the sprite)
    pub demo_location: String,
    /// Path to a custom demo template (empty or missing: built-in template)
    pub demo_template: String,
    /// Demo page title (empty: derived from the sprite filename)
    pub demo_title: String,
    /// Drop inline `style` attributes
    pub cleanup: bool,
}

impl Default for Options {
    fn default() -> Self {
        let svg = [
            ("version", "1.1"),
            ("xmlns", "http://www.w3.org/2000/svg"),
            ("xmlns:xlink", "http://www.w3.org/1999/xlink"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            prefix: String::new(),
            svg,
            symbol: BTreeMap::new(),
            formatting: None,
            demo_formatting: None,
            include_demo: false,
            force_close_tags: Vec::new(),
            include_desc: true,
            include_title: true,
            include_view_box: true,
            insert_into_defs: false,
            demo_location: String::new(),
            demo_template: String::new(),
            demo_title: String::new(),
            cleanup: false,
        }
    }
}

impl Options {
    /// Anchor relative `demoTemplate` and `demoLocation` paths at `base_dir`.
    pub fn relative_to(mut self, base_dir: &Path) -> Self {
        for path in [&mut self.demo_template, &mut self.demo_location] {
            if !path.is_empty() && Path::new(path.as_str()).is_relative() {
                *path = base_dir.join(path.as_str()).to_string_lossy().into_owned();
            }
        }
        self
    }
}

/// Pretty-print settings for the sprite or the demo page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Formatting {
    pub indent_size: usize,
    /// Single-byte indent character, usually `' '` or `'\t'`
    pub indent_char: char,
}

impl Default for Formatting {
    fn default() -> Self {
        Self {
            indent_size: 4,
            indent_char: ' ',
        }
    }
}

/// `false`, `true` or a settings table.
fn deserialize_formatting<'de, D>(deserializer: D) -> Result<Option<Formatting>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Setting {
        Toggle(bool),
        Config(Formatting),
    }

    Ok(match Setting::deserialize(deserializer)? {
        Setting::Toggle(false) => None,
        Setting::Toggle(true) => Some(Formatting::default()),
        Setting::Config(f) => Some(f),
    })
}

/// Returns the default options as a `toml::Value::Table`, the base tier of
/// every merge.
pub fn defaults_value() -> Result<toml::Value, SvgstoreError> {
    toml::Value::try_from(Options::default())
        .map_err(|e| SvgstoreError::InvalidConfig(e.to_string()))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Resolve defaults → task → target into one [`Options`].
pub fn resolve_options(
    task: Option<&toml::Value>,
    target: Option<&toml::Value>,
) -> Result<Options, SvgstoreError> {
    let mut merged = defaults_value()?;
    for tier in [task, target].into_iter().flatten() {
        merged = merge_toml(merged, tier.clone());
    }
    let options: Options = merged.try_into()?;

    for formatting in [&options.formatting, &options.demo_formatting]
        .into_iter()
        .flatten()
    {
        if !formatting.indent_char.is_ascii() {
            return Err(SvgstoreError::InvalidConfig(format!(
                "indentChar must be an ASCII character, got {:?}",
                formatting.indent_char
            )));
        }
    }

    Ok(options)
}

/// A `svgstore.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Task-level options, applied to every target
    pub options: Option<toml::Value>,
    pub targets: BTreeMap<String, TargetConfig>,
    /// Directory relative paths in the file are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    /// Target-level options
    pub options: Option<toml::Value>,
    pub files: Vec<FileMapping>,
}

/// Source patterns merged into one destination sprite.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileMapping {
    pub src: Vec<String>,
    pub dest: PathBuf,
}

impl ConfigFile {
    pub fn parse(content: &str) -> Result<Self, SvgstoreError> {
        Ok(toml::from_str(content)?)
    }

    /// Read a config file. Its directory becomes the base for source
    /// patterns and demo paths.
    pub fn load(path: &Path) -> Result<Self, SvgstoreError> {
        let content = fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.base_dir = path.parent().unwrap_or(Path::new("")).to_path_buf();
        Ok(config)
    }

    /// Resolve the task options with an extra target-level tier on top.
    pub fn task_options(&self, target: Option<&toml::Value>) -> Result<Options, SvgstoreError> {
        Ok(resolve_options(self.options.as_ref(), target)?.relative_to(&self.base_dir))
    }

    /// Resolve the options of a named target.
    pub fn target_options(&self, name: &str) -> Result<Options, SvgstoreError> {
        let target = self
            .targets
            .get(name)
            .ok_or_else(|| SvgstoreError::InvalidConfig(format!("unknown target \"{name}\"")))?;
        self.task_options(target.options.as_ref())
    }
}
