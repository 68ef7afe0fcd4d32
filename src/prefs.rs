//! Persisted language preference.
//!
//! A single stored value: the last language the user explicitly chose. Read
//! once at initialization (it outranks locale negotiation) and written on
//! every successful switch. Storage failures are never surfaced — a broken
//! store degrades to "no preference" on read and to a logged skip on write.

use std::cell::Cell;
use std::path::PathBuf;

use crate::lang::Lang;

/// Accessor for the persisted language choice.
pub trait PreferenceStore {
    /// The stored preference, or `None` when absent or unreadable.
    fn load(&self) -> Option<Lang>;

    /// Persist a new preference. Failures are logged and swallowed.
    fn store(&self, lang: Lang);
}

/// File-backed store: the bare locale code in a small text file.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Option<Lang> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        let code = text.trim();
        let lang = Lang::from_code(code);
        if lang.is_none() && !code.is_empty() {
            log::warn!("ignoring unrecognized language preference: {code:?}");
        }
        lang
    }

    fn store(&self, lang: Lang) {
        if let Err(err) = std::fs::write(&self.path, lang.code()) {
            log::warn!(
                "cannot persist language preference to {}: {err}",
                self.path.display()
            );
        }
    }
}

/// In-memory store for tests and one-shot CLI runs.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    value: Cell<Option<Lang>>,
}

impl MemoryPreferenceStore {
    pub fn new(initial: Option<Lang>) -> Self {
        Self {
            value: Cell::new(initial),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Option<Lang> {
        self.value.get()
    }

    fn store(&self, lang: Lang) {
        self.value.set(Some(lang));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("pref"));
        assert_eq!(store.load(), None);
        store.store(Lang::He);
        assert_eq!(store.load(), Some(Lang::He));
        store.store(Lang::En);
        assert_eq!(store.load(), Some(Lang::En));
    }

    #[test]
    fn file_store_tolerates_trailing_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pref");
        std::fs::write(&path, "he\n").unwrap();
        assert_eq!(FilePreferenceStore::new(&path).load(), Some(Lang::He));
    }

    #[test]
    fn file_store_ignores_garbage_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pref");
        std::fs::write(&path, "klingon").unwrap();
        assert_eq!(FilePreferenceStore::new(&path).load(), None);
    }

    #[test]
    fn file_store_write_failure_is_swallowed() {
        // Directory path as the target file: write fails, must not panic
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path());
        store.store(Lang::He);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryPreferenceStore::default();
        assert_eq!(store.load(), None);
        store.store(Lang::He);
        assert_eq!(store.load(), Some(Lang::He));
    }
}
