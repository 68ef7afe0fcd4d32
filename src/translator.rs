//! The translator core: language lifecycle for one document.
//!
//! Owns the active locale state — current language, loaded bundle, derived
//! direction — and drives every language transition. All external effects
//! go through injected dependencies: a [`BundleSource`] for locale data, a
//! [`PreferenceStore`] for the persisted choice, and a [`Document`] for
//! reading markers and writing translations. That makes the whole state
//! machine constructible in isolation.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --initialize--> Loading(lang) --success--> Ready(lang)
//!                                      \--failure (embedded fallback)--> Ready(lang)
//! Ready(a) --switch b (b != a)--> Loading(b) --...--> Ready(b)
//! Ready(a) --switch a--> Ready(a)          (no-op self-loop)
//! ```
//!
//! Failure never produces a stuck state: a failed load lands in
//! `Ready` on the embedded bundle, and nothing here returns an error.
//!
//! ## Switch serialization
//!
//! Switch requests go through a last-wins pending slot drained by
//! [`Translator::run_queued`]. Two rapid requests perform exactly one
//! load — of the latest language — so the document can never end up mixing
//! languages. An in-flight guard makes a re-entrant drain a no-op; the
//! outer drain picks the queued request up.
//!
//! A completed switch runs in this order: load bundle, update state,
//! persist preference, re-apply translations, re-apply direction, update
//! the switcher, notify listeners. Initialization applies and sets
//! direction but neither persists nor notifies.

use crate::bundle::Bundle;
use crate::document::{ApplyReport, Document, apply_language};
use crate::lang::{self, Lang};
use crate::prefs::PreferenceStore;
use crate::source::{BundleSource, Provenance, load_with_fallback};

/// Lifecycle state of the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading(Lang),
    Ready(Lang),
}

/// Result of a completed (or skipped) language switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchOutcome {
    pub language: Lang,
    pub provenance: Provenance,
    /// False for the no-op self-loop (requested language already active).
    pub changed: bool,
}

pub struct Translator {
    source: Box<dyn BundleSource>,
    prefs: Box<dyn PreferenceStore>,
    phase: Phase,
    bundle: Option<Bundle>,
    provenance: Provenance,
    pending: Option<Lang>,
    in_flight: bool,
    listeners: Vec<Box<dyn Fn(Lang)>>,
}

impl Translator {
    pub fn new(source: Box<dyn BundleSource>, prefs: Box<dyn PreferenceStore>) -> Self {
        Self {
            source,
            prefs,
            phase: Phase::Uninitialized,
            bundle: None,
            provenance: Provenance::Embedded,
            pending: None,
            in_flight: false,
            listeners: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The active language once initialized.
    pub fn current_language(&self) -> Option<Lang> {
        match self.phase {
            Phase::Ready(lang) | Phase::Loading(lang) => Some(lang),
            Phase::Uninitialized => None,
        }
    }

    /// Whether the active language reads right-to-left.
    pub fn is_rtl(&self) -> bool {
        self.current_language().is_some_and(Lang::is_rtl)
    }

    /// Where the active bundle came from.
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Register a listener notified with the new language after every
    /// completed switch (not on initialization, not on the no-op self-loop).
    pub fn subscribe(&mut self, listener: impl Fn(Lang) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Resolve a dotted key against the active bundle, falling back to the
    /// literal key when missing or before initialization.
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        match &self.bundle {
            Some(bundle) => bundle.resolve_or_key(key),
            None => key,
        }
    }

    /// Initial language: persisted preference first, then negotiation over
    /// the runtime's reported tags, then the English default.
    pub fn detect_initial(&self, runtime_tags: &[String]) -> Lang {
        self.prefs
            .load()
            .unwrap_or_else(|| lang::negotiate(runtime_tags))
    }

    /// Initialize from the operating system's locale list.
    pub fn initialize(&mut self, doc: &mut dyn Document) -> SwitchOutcome {
        self.initialize_with_tags(&lang::system_tags(), doc)
    }

    /// Initialize with an explicit runtime tag list (testable variant).
    ///
    /// Loads the negotiated bundle, applies it, and sets direction. Does
    /// not persist and does not notify — only explicit switches do.
    pub fn initialize_with_tags(
        &mut self,
        runtime_tags: &[String],
        doc: &mut dyn Document,
    ) -> SwitchOutcome {
        let lang = self.detect_initial(runtime_tags);
        let outcome = self.activate(lang);
        self.sync_document(doc);
        outcome
    }

    /// Load a language into the active state without the switch ceremony
    /// (no persistence, no notification, no document work).
    pub fn activate(&mut self, lang: Lang) -> SwitchOutcome {
        if self.phase == Phase::Ready(lang) {
            return SwitchOutcome {
                language: lang,
                provenance: self.provenance,
                changed: false,
            };
        }
        self.phase = Phase::Loading(lang);
        let (bundle, provenance) = load_with_fallback(self.source.as_ref(), lang);
        self.bundle = Some(bundle);
        self.provenance = provenance;
        self.phase = Phase::Ready(lang);
        SwitchOutcome {
            language: lang,
            provenance,
            changed: true,
        }
    }

    /// Record a switch request. The latest request wins; nothing happens
    /// until [`Self::run_queued`] drains the slot.
    pub fn queue_switch(&mut self, lang: Lang) {
        self.pending = Some(lang);
    }

    /// Drain queued switch requests, serialized.
    ///
    /// Returns `None` when called re-entrantly while a switch is already in
    /// flight (the active drain will pick the request up), or when nothing
    /// is queued. Otherwise returns the outcome of the last performed
    /// switch.
    pub fn run_queued(&mut self, mut doc: Option<&mut dyn Document>) -> Option<SwitchOutcome> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        let mut outcome = None;
        while let Some(next) = self.pending.take() {
            // Reborrow per iteration; the drain may perform several switches
            let d: Option<&mut dyn Document> = match doc {
                Some(ref mut d) => Some(&mut **d),
                None => None,
            };
            outcome = Some(self.perform_switch(next, d));
        }
        self.in_flight = false;
        outcome
    }

    /// Switch the active language and synchronize the document.
    ///
    /// No-op when `lang` is already active. Returns `None` only when the
    /// request was queued behind an in-flight switch.
    pub fn switch_language(&mut self, lang: Lang, doc: &mut dyn Document) -> Option<SwitchOutcome> {
        self.queue_switch(lang);
        self.run_queued(Some(doc))
    }

    /// Switch the active language without a document (build pipelines
    /// synchronize their pages separately via [`Self::sync_document`]).
    pub fn set_language(&mut self, lang: Lang) -> Option<SwitchOutcome> {
        self.queue_switch(lang);
        self.run_queued(None)
    }

    fn perform_switch(&mut self, lang: Lang, doc: Option<&mut dyn Document>) -> SwitchOutcome {
        let outcome = self.activate(lang);
        if !outcome.changed {
            return outcome;
        }
        self.prefs.store(lang);
        if let Some(doc) = doc {
            self.sync_document(doc);
        }
        for listener in &self.listeners {
            listener(lang);
        }
        outcome
    }

    /// The active bundle once initialized.
    pub fn bundle(&self) -> Option<&Bundle> {
        self.bundle.as_ref()
    }

    /// Apply the active bundle and presentation state to a document via
    /// [`apply_language`].
    ///
    /// Before initialization this is a no-op reporting zero applied nodes.
    pub fn sync_document(&self, doc: &mut dyn Document) -> ApplyReport {
        let (Phase::Ready(lang), Some(bundle)) = (self.phase, &self.bundle) else {
            return ApplyReport::default();
        };
        apply_language(doc, bundle, lang)
    }
}
