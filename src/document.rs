//! Document abstraction: what needs translating, separated from how it is
//! written back.
//!
//! A scan pass over a [`Document`] produces typed [`TranslatableNode`]
//! descriptors. The pure [`translate`] function turns descriptors plus a
//! bundle into concrete [`Edit`]s (and a list of missing keys); the
//! document then applies those edits. This keeps "find what needs
//! translating" and "write the translation" independently testable — the
//! translator core never touches page internals directly.
//!
//! Two backends exist: [`crate::html::HtmlPage`] for real pages and
//! [`MemoryDocument`] for tests.

use crate::bundle::Bundle;
use crate::lang::{Direction, Lang};

/// What part of a node a translation key feeds.
///
/// The variant order is the application order: text content first, then
/// placeholder, tooltip title, image alt text, and finally the document
/// title element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkerKind {
    Text,
    Placeholder,
    Title,
    Alt,
    DocumentTitle,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 5] = [
        MarkerKind::Text,
        MarkerKind::Placeholder,
        MarkerKind::Title,
        MarkerKind::Alt,
        MarkerKind::DocumentTitle,
    ];

    /// The marker attribute carrying this kind's key on a page.
    pub fn attr(self) -> &'static str {
        match self {
            MarkerKind::Text | MarkerKind::DocumentTitle => "data-i18n",
            MarkerKind::Placeholder => "data-i18n-placeholder",
            MarkerKind::Title => "data-i18n-title",
            MarkerKind::Alt => "data-i18n-alt",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarkerKind::Text => "text",
            MarkerKind::Placeholder => "placeholder",
            MarkerKind::Title => "title",
            MarkerKind::Alt => "alt",
            MarkerKind::DocumentTitle => "document title",
        }
    }
}

/// A node that opted into translation via a marker attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatableNode {
    pub kind: MarkerKind,
    pub key: String,
}

/// A resolved translation ready to be written into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub kind: MarkerKind,
    pub key: String,
    pub value: String,
}

/// Result of translating a scanned node list against a bundle.
#[derive(Debug, Clone, Default)]
pub struct TranslationPass {
    /// Edits in application order (text, placeholder, title, alt, doc title).
    pub edits: Vec<Edit>,
    /// Keys that were absent from the bundle (their edits carry the literal
    /// key as the value).
    pub missing: Vec<String>,
}

/// Resolve every scanned node against a bundle.
///
/// Total: every node yields an edit. Missing keys fall back to the literal
/// key text (visible fallback, never empty) and are reported in `missing`.
pub fn translate(nodes: &[TranslatableNode], bundle: &Bundle) -> TranslationPass {
    let mut pass = TranslationPass::default();
    for kind in MarkerKind::ALL {
        for node in nodes.iter().filter(|n| n.kind == kind) {
            let value = match bundle.resolve(&node.key) {
                Some(text) => text.to_string(),
                None => {
                    log::warn!("translation key not found: {}", node.key);
                    pass.missing.push(node.key.clone());
                    node.key.clone()
                }
            };
            pass.edits.push(Edit {
                kind: node.kind,
                key: node.key.clone(),
                value,
            });
        }
    }
    pass
}

/// What applying a language to a document touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Markers found and written.
    pub applied: usize,
    /// Keys absent from the bundle (written as literal key text).
    pub missing: Vec<String>,
}

/// Apply a bundle and its language's presentation state to a document.
///
/// One fixed sequence for every caller: translations in marker-kind order,
/// then direction attributes, RTL stylesheet, and switcher active state.
/// This is the single place the "document matches the active language"
/// invariant is established.
pub fn apply_language(doc: &mut dyn Document, bundle: &Bundle, lang: Lang) -> ApplyReport {
    let nodes = doc.scan();
    let pass = translate(&nodes, bundle);
    doc.apply(&pass.edits);
    doc.set_direction(lang.direction(), lang);
    doc.set_rtl_stylesheet(lang.is_rtl());
    doc.set_active_switcher(lang);
    ApplyReport {
        applied: pass.edits.len(),
        missing: pass.missing,
    }
}

/// A translatable page, with injected write access.
///
/// Implementations must make every operation idempotent: applying the same
/// edits or direction twice leaves the document unchanged.
pub trait Document {
    /// Find every node carrying a translation marker.
    fn scan(&self) -> Vec<TranslatableNode>;

    /// Write resolved translations back, overwriting prior content.
    fn apply(&mut self, edits: &[Edit]);

    /// Set the root direction and language attributes plus the body
    /// presentation class.
    fn set_direction(&mut self, direction: Direction, lang: Lang);

    /// Ensure the RTL stylesheet is present iff `present`.
    fn set_rtl_stylesheet(&mut self, present: bool);

    /// Mark exactly one switcher button active. Pages without a switcher
    /// silently ignore this.
    fn set_active_switcher(&mut self, lang: Lang);
}

/// In-memory document for exercising the translator without HTML.
#[derive(Debug, Default, Clone)]
pub struct MemoryDocument {
    nodes: Vec<TranslatableNode>,
    /// Current value per node, parallel to `nodes`.
    values: Vec<Option<String>>,
    pub direction: Option<Direction>,
    pub lang: Option<Lang>,
    pub rtl_stylesheet: bool,
    pub active_switcher: Option<Lang>,
}

impl MemoryDocument {
    pub fn new(nodes: Vec<TranslatableNode>) -> Self {
        let values = vec![None; nodes.len()];
        Self {
            nodes,
            values,
            ..Self::default()
        }
    }

    /// Convenience: a document of plain text markers for the given keys.
    pub fn with_text_keys(keys: &[&str]) -> Self {
        Self::new(
            keys.iter()
                .map(|k| TranslatableNode {
                    kind: MarkerKind::Text,
                    key: (*k).to_string(),
                })
                .collect(),
        )
    }

    /// Current value of the first node with the given key.
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.nodes
            .iter()
            .position(|n| n.key == key)
            .and_then(|i| self.values[i].as_deref())
    }

    /// Snapshot of all node values, for round-trip comparisons.
    pub fn values(&self) -> Vec<Option<String>> {
        self.values.clone()
    }
}

impl Document for MemoryDocument {
    fn scan(&self) -> Vec<TranslatableNode> {
        self.nodes.clone()
    }

    fn apply(&mut self, edits: &[Edit]) {
        for edit in edits {
            for (i, node) in self.nodes.iter().enumerate() {
                if node.kind == edit.kind && node.key == edit.key {
                    self.values[i] = Some(edit.value.clone());
                }
            }
        }
    }

    fn set_direction(&mut self, direction: Direction, lang: Lang) {
        self.direction = Some(direction);
        self.lang = Some(lang);
    }

    fn set_rtl_stylesheet(&mut self, present: bool) {
        self.rtl_stylesheet = present;
    }

    fn set_active_switcher(&mut self, lang: Lang) {
        self.active_switcher = Some(lang);
    }
}
