use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SvgstoreError {
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid source pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Invalid tag pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("{}: {source}", .path.display())]
    Icon {
        path: PathBuf,
        #[source]
        source: Box<SvgstoreError>,
    },
}
