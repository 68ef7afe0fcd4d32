//! Locale bundles: nested translation dictionaries keyed by dotted paths.
//!
//! A bundle is the complete set of strings for one language, loaded from a
//! JSON object whose values are either strings or nested objects:
//!
//! ```json
//! {
//!   "nav": { "home": "Home", "catalog": "Catalog" },
//!   "footer": { "contactTitle": "Contact" }
//! }
//! ```
//!
//! Lookup uses dotted key paths (`nav.home`). A miss never fails: callers
//! get the literal key back so pages render visibly wrong rather than
//! blank, and the miss is logged for content authors.
//!
//! Bundles are immutable after load and replaced wholesale on language
//! switch — there is no partial merge.
//!
//! ## Embedded snapshot
//!
//! A copy of each bundle ships inside the binary (`assets/locales/`), used
//! whenever the external locale resource is unreachable. The external files
//! are the source of truth; `sitelang check` reports any drift between the
//! two (see [`Bundle::diff`]).

use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::lang::Lang;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bundle root must be a JSON object")]
    NotAnObject,
}

/// One entry in the bundle tree: a leaf string or a nested group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    Group(BTreeMap<String, Message>),
}

/// The complete set of translated strings for one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle {
    root: BTreeMap<String, Message>,
}

/// One difference between two bundles, keyed by flattened dotted path.
#[derive(Debug, Clone, PartialEq)]
pub enum Drift {
    /// Key present in the external bundle but absent from the embedded one.
    MissingEmbedded(String),
    /// Key present in the embedded bundle but absent from the external one.
    MissingExternal(String),
    /// Key present in both with different values.
    ValueMismatch(String),
}

impl std::fmt::Display for Drift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Drift::MissingEmbedded(k) => write!(f, "{k}: missing from embedded snapshot"),
            Drift::MissingExternal(k) => write!(f, "{k}: missing from external bundle"),
            Drift::ValueMismatch(k) => write!(f, "{k}: embedded and external values differ"),
        }
    }
}

impl Bundle {
    /// Parse a bundle from JSON text.
    ///
    /// The root must be an object; anything else (array, string, number) is
    /// a malformed bundle and is treated by callers as resource-unavailable.
    pub fn from_json(text: &str) -> Result<Self, BundleError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(BundleError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Resolve a dotted key path to its string.
    ///
    /// Returns `None` when any path segment is missing, when a segment hits
    /// a leaf before the path is exhausted, or when the full path lands on a
    /// group rather than a string.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            match current {
                Message::Group(children) => current = children.get(segment)?,
                Message::Text(_) => return None,
            }
        }
        match current {
            Message::Text(text) => Some(text),
            Message::Group(_) => None,
        }
    }

    /// Resolve a key, falling back to the literal key on a miss.
    ///
    /// The visible-fallback contract: a page never loses text because a key
    /// went missing, it shows the key itself. Misses are logged so content
    /// authors can spot them.
    pub fn resolve_or_key<'a>(&'a self, key: &'a str) -> &'a str {
        match self.resolve(key) {
            Some(text) => text,
            None => {
                log::warn!("translation key not found: {key}");
                key
            }
        }
    }

    /// Flatten the tree into dotted-path → string pairs, sorted by key.
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut flat = BTreeMap::new();
        flatten_into(&self.root, "", &mut flat);
        flat
    }

    /// Number of leaf strings in the bundle.
    pub fn len(&self) -> usize {
        self.flatten().len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Compare this (external) bundle against an embedded snapshot.
    ///
    /// Returns every flattened key where the two disagree. Empty means the
    /// snapshot is lossless with respect to the external resource.
    pub fn diff(&self, embedded: &Bundle) -> Vec<Drift> {
        let external = self.flatten();
        let snapshot = embedded.flatten();
        let mut drift = Vec::new();
        for (key, value) in &external {
            match snapshot.get(key) {
                None => drift.push(Drift::MissingEmbedded(key.clone())),
                Some(other) if other != value => drift.push(Drift::ValueMismatch(key.clone())),
                Some(_) => {}
            }
        }
        for key in snapshot.keys() {
            if !external.contains_key(key) {
                drift.push(Drift::MissingExternal(key.clone()));
            }
        }
        drift
    }

    /// Keys present in this bundle but absent from `other`.
    ///
    /// Used for cross-language parity checks: every key in the English
    /// bundle should exist in the Hebrew one and vice versa.
    pub fn missing_from(&self, other: &Bundle) -> Vec<String> {
        let ours = self.flatten();
        let theirs = other.flatten();
        ours.keys()
            .filter(|k| !theirs.contains_key(*k))
            .cloned()
            .collect()
    }

    /// Serialize back to pretty-printed JSON (used by `sitelang sync`).
    pub fn to_json_pretty(&self) -> String {
        // A BTreeMap of strings/groups always serializes
        serde_json::to_string_pretty(&self.root).unwrap_or_else(|_| "{}".to_string())
    }
}

fn flatten_into(node: &BTreeMap<String, Message>, prefix: &str, out: &mut BTreeMap<String, String>) {
    for (name, message) in node {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match message {
            Message::Text(text) => {
                out.insert(path, text.clone());
            }
            Message::Group(children) => flatten_into(children, &path, out),
        }
    }
}

#[derive(RustEmbed)]
#[folder = "assets/locales/"]
struct EmbeddedLocales;

/// The embedded snapshot bundle for a language.
///
/// These assets are compiled in and validated by the test suite, so a parse
/// failure here is a build defect, not a runtime condition.
pub fn embedded(lang: Lang) -> Bundle {
    let filename = format!("{}.json", lang.code());
    let file = EmbeddedLocales::get(&filename)
        .unwrap_or_else(|| panic!("embedded locale asset missing: {filename}"));
    let text = String::from_utf8_lossy(file.data.as_ref());
    Bundle::from_json(&text).expect("embedded locale asset is valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Bundle {
        Bundle::from_json(
            r#"{
                "nav": { "home": "Home", "catalog": "Catalog" },
                "hero": { "title": "Advanced Technology", "stats": { "clinics": "500+" } },
                "footer": { "contactTitle": "Contact" }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_nested_keys() {
        let b = sample();
        assert_eq!(b.resolve("nav.home"), Some("Home"));
        assert_eq!(b.resolve("hero.stats.clinics"), Some("500+"));
    }

    #[test]
    fn missing_segment_resolves_to_none() {
        let b = sample();
        assert_eq!(b.resolve("nav.missing"), None);
        assert_eq!(b.resolve("nope.home"), None);
    }

    #[test]
    fn path_through_a_leaf_resolves_to_none() {
        let b = sample();
        // "nav.home" is a leaf; descending further must not panic
        assert_eq!(b.resolve("nav.home.deeper"), None);
    }

    #[test]
    fn path_landing_on_a_group_resolves_to_none() {
        let b = sample();
        assert_eq!(b.resolve("nav"), None);
        assert_eq!(b.resolve("hero.stats"), None);
    }

    #[test]
    fn fallback_returns_literal_key() {
        let b = sample();
        assert_eq!(b.resolve_or_key("does.not.exist"), "does.not.exist");
        assert_eq!(b.resolve_or_key("nav.home"), "Home");
    }

    #[test]
    fn present_keys_resolve_to_non_empty_strings() {
        let b = sample();
        for (key, _) in b.flatten() {
            assert!(!b.resolve_or_key(&key).is_empty(), "empty value for {key}");
        }
    }

    #[test]
    fn flatten_produces_dotted_paths() {
        let flat = sample().flatten();
        assert_eq!(flat.get("hero.stats.clinics").map(String::as_str), Some("500+"));
        assert_eq!(flat.len(), 5);
    }

    #[test]
    fn malformed_root_is_rejected() {
        assert!(matches!(
            Bundle::from_json("[1, 2, 3]"),
            Err(BundleError::NotAnObject)
        ));
        assert!(Bundle::from_json("not json").is_err());
    }

    #[test]
    fn diff_reports_all_three_drift_kinds() {
        let external = Bundle::from_json(r#"{"a": "1", "b": "2"}"#).unwrap();
        let snapshot = Bundle::from_json(r#"{"a": "1", "b": "changed", "c": "3"}"#).unwrap();
        let drift = external.diff(&snapshot);
        assert!(drift.contains(&Drift::ValueMismatch("b".into())));
        assert!(drift.contains(&Drift::MissingExternal("c".into())));
        let external2 = Bundle::from_json(r#"{"a": "1", "d": "4"}"#).unwrap();
        let drift2 = external2.diff(&snapshot);
        assert!(drift2.contains(&Drift::MissingEmbedded("d".into())));
    }

    #[test]
    fn identical_bundles_have_no_drift() {
        assert!(sample().diff(&sample()).is_empty());
    }

    #[test]
    fn missing_from_lists_parity_gaps() {
        let en = Bundle::from_json(r#"{"nav": {"home": "Home", "about": "About"}}"#).unwrap();
        let he = Bundle::from_json(r#"{"nav": {"home": "בית"}}"#).unwrap();
        assert_eq!(en.missing_from(&he), vec!["nav.about".to_string()]);
        assert!(he.missing_from(&en).is_empty());
    }

    #[test]
    fn embedded_bundles_parse_for_all_languages() {
        for lang in Lang::ALL {
            let b = embedded(lang);
            assert!(!b.is_empty(), "embedded {lang} bundle is empty");
            assert!(b.resolve("nav.home").is_some());
        }
    }

    #[test]
    fn embedded_bundles_have_key_parity() {
        let en = embedded(Lang::En);
        let he = embedded(Lang::He);
        assert!(en.missing_from(&he).is_empty(), "keys missing from he");
        assert!(he.missing_from(&en).is_empty(), "keys missing from en");
    }
}
