//! # sitelang
//!
//! Build-time Hebrew/English localizer for static sites. Pages opt nodes
//! into translation with `data-i18n` marker attributes; sitelang resolves
//! them against JSON locale bundles and emits one fully localized page tree
//! per language, with right-to-left presentation wired for Hebrew.
//!
//! # Architecture: Pipeline Around a Translator Core
//!
//! The CLI is a thin pipeline around a reusable translator core:
//!
//! ```text
//! 1. Scan      site/      →  marker inventory   (pages → structured data)
//! 2. Localize  inventory  →  dist/{en,he}/      (translated page trees)
//! 3. Check     bundles    →  health report      (drift, parity, unresolved keys)
//! ```
//!
//! The core ([`translator::Translator`]) owns the language lifecycle —
//! detect, load, apply, persist, re-apply — behind injected dependencies:
//! a [`source::BundleSource`] for locale data, a [`prefs::PreferenceStore`]
//! for the persisted choice, and a [`document::Document`] for page access.
//! The pipeline drives it once per language; embedders can drive it
//! directly against their own backends.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`lang`] | Language and direction types, tag negotiation |
//! | [`bundle`] | Nested translation dictionaries, dotted-key lookup, drift diffing |
//! | [`source`] | Bundle loading (file, HTTP) with embedded-snapshot fallback |
//! | [`prefs`] | Persisted language preference |
//! | [`document`] | Document trait, marker model, pure translate pass |
//! | [`html`] | HTML page backend — regex-based marker rewriting |
//! | [`translator`] | The lifecycle core: detect → load → apply → persist |
//! | [`scan`] | Stage 1 — page discovery and marker inventory |
//! | [`localize`] | Stage 2 — emit one localized tree per language |
//! | [`check`] | Stage 3 — bundle health, parity, unresolved-key checks |
//! | [`config`] | `localize.toml` loading and validation |
//! | [`output`] | CLI output formatting for pipeline results |
//!
//! # Design Decisions
//!
//! ## Failure Never Blanks a Page
//!
//! Two fallbacks guarantee readable output no matter what breaks. A bundle
//! that cannot be loaded (missing file, HTTP failure, malformed JSON) is
//! replaced by a snapshot compiled into the binary; a key the bundle cannot
//! resolve is rendered as its literal dotted path. Both are logged and
//! surfaced by `sitelang check`, never raised as errors.
//!
//! ## External Bundles Are the Source of Truth
//!
//! The embedded snapshot exists only for availability. `check` reports any
//! drift between the external files and the snapshot, and `sync` rewrites
//! the external files from the snapshot when they have been lost.
//!
//! ## Whole-Bundle Replacement
//!
//! A language switch replaces the entire bundle — there is no partial merge
//! and no per-key caching. Bundles are small (a few hundred strings), and
//! wholesale replacement makes the consistency argument trivial: a document
//! synchronized after a switch reflects exactly one language.
//!
//! ## Regex Rewriting Over an HTML Parser
//!
//! Pages are rewritten with targeted regular expressions rather than parsed
//! into a DOM. This preserves the author's formatting byte-for-byte outside
//! the edited spans and keeps the dependency surface small. The one
//! authoring constraint it imposes — marker elements contain plain text
//! only — already holds for every marker in practice.

pub mod bundle;
pub mod check;
pub mod config;
pub mod document;
pub mod html;
pub mod lang;
pub mod localize;
pub mod output;
pub mod prefs;
pub mod scan;
pub mod source;
pub mod translator;

#[cfg(test)]
pub(crate) mod test_helpers;
