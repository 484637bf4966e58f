//! Per-icon id namespacing.
//!
//! Every id in an icon is prefixed with `svgstore` plus the MD5 of the icon's
//! raw text, and every internal reference is pointed at the new id. The map is
//! built from one file only, so two icons that both define `id="a"` end up
//! with different ids in the sprite.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::warn;

use crate::ast::Element;

static URL_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"url\(\s*#([^\s)]+)\s*\)").expect("url() pattern is valid")
});

/// Old id to namespaced id, local to one icon.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    ids: HashMap<String, String>,
}

impl IdMap {
    pub fn get(&self, id: &str) -> Option<&str> {
        self.ids.get(id).map(String::as_str)
    }

    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) {
        self.ids.insert(old.into(), new.into());
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Result of rewriting the `url(#id)` references in one attribute value.
#[derive(Debug, PartialEq, Eq)]
pub struct UrlRewrite<'a> {
    pub value: Cow<'a, str>,
    /// Referenced ids with no entry in the map, left untouched
    pub unresolved: Vec<String>,
}

/// Hex MD5 of an icon's raw text.
pub fn fingerprint(content: &str) -> String {
    format!("{:x}", md5::compute(content.as_bytes()))
}

/// Namespace every id under `root` and repoint references to them.
///
/// Unresolved references are left as they are and reported with a warning.
/// With `cleanup`, inline `style` attributes are dropped.
pub fn rewrite_ids(root: &mut Element, fingerprint: &str, cleanup: bool) -> IdMap {
    let mut ids = IdMap::default();

    root.for_each_element_mut(&mut |elem: &mut Element| {
        if let Some(id) = elem.get_attr("id").map(str::to_string) {
            let new_id = format!("svgstore{fingerprint}{id}");
            elem.set_attr("id", new_id.as_str());
            ids.insert(id, new_id);
        }
    });

    root.for_each_element_mut(&mut |elem: &mut Element| {
        let tag = elem.name.full_name();
        for attr in &mut elem.attributes {
            let name = attr.name.full_name();

            let rewrite = rewrite_url_refs(&attr.value, &ids);
            for id in &rewrite.unresolved {
                warn!(attribute = %name, element = %tag, id = %id, "unresolved id reference");
            }
            if let Cow::Owned(value) = rewrite.value {
                attr.value = value;
            }

            // Fragment-only href / xlink:href
            if attr.name.local == "href"
                && let Some(id) = attr.value.strip_prefix('#')
                && !id.is_empty()
            {
                match ids.get(id) {
                    Some(new_id) => attr.value = format!("#{new_id}"),
                    None => {
                        warn!(attribute = %name, element = %tag, id = %id, "unresolved id reference")
                    }
                }
            }
        }

        if cleanup {
            elem.remove_attr("style");
        }
    });

    ids
}

/// Replace every `url(#id)` in `value` whose id is in `ids`.
///
/// Pure function: all matches are found in one pass over `value`.
pub fn rewrite_url_refs<'a>(value: &'a str, ids: &IdMap) -> UrlRewrite<'a> {
    let mut unresolved = Vec::new();
    let value = URL_REF.replace_all(value, |caps: &Captures| match ids.get(&caps[1]) {
        Some(new_id) => format!("url(#{new_id})"),
        None => {
            unresolved.push(caps[1].to_string());
            caps[0].to_string()
        }
    });
    UrlRewrite { value, unresolved }
}
