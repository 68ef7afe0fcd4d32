//! Locale health checks, and the `sync` repair for what they find.
//!
//! Three independent checks, all read-only:
//!
//! | Check      | Question                                                    |
//! |------------|-------------------------------------------------------------|
//! | bundles    | Does each external bundle parse, and does it drift from the |
//! |            | embedded snapshot?                                          |
//! | parity     | Does every key exist in every enabled language?             |
//! | unresolved | Does every key a page references resolve in every language? |
//!
//! A clean report means a localization run will produce no literal-key
//! fallbacks and the embedded snapshot is a faithful copy of the external
//! bundles. [`export_embedded`] (the `sync` subcommand) repairs snapshot
//! drift by rewriting the external files from the embedded copies.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::bundle::{self, Bundle, Drift};
use crate::config::LocalizeConfig;
use crate::lang::Lang;
use crate::scan::{self, ScanError};
use crate::source::BundleSource;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("refusing to overwrite {0} (pass --force to allow)")]
    WouldOverwrite(String),
}

/// Health of one language's external bundle.
#[derive(Debug, Clone)]
pub struct BundleCheck {
    pub lang: Lang,
    /// `None` when the bundle loaded; otherwise why it did not.
    pub load_error: Option<String>,
    /// Differences between the external bundle and the embedded snapshot.
    /// Empty when the bundle failed to load.
    pub drift: Vec<Drift>,
}

/// Keys present in one language but absent from another.
#[derive(Debug, Clone)]
pub struct ParityGap {
    pub present_in: Lang,
    pub missing_from: Lang,
    pub keys: Vec<String>,
}

/// A page-referenced key that a language's bundle cannot resolve.
#[derive(Debug, Clone)]
pub struct UnresolvedKey {
    pub lang: Lang,
    pub key: String,
}

#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub bundles: Vec<BundleCheck>,
    pub parity: Vec<ParityGap>,
    pub unresolved: Vec<UnresolvedKey>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.bundles
            .iter()
            .all(|b| b.load_error.is_none() && b.drift.is_empty())
            && self.parity.is_empty()
            && self.unresolved.is_empty()
    }

    pub fn problem_count(&self) -> usize {
        self.bundles
            .iter()
            .map(|b| usize::from(b.load_error.is_some()) + b.drift.len())
            .sum::<usize>()
            + self.parity.iter().map(|p| p.keys.len()).sum::<usize>()
            + self.unresolved.len()
    }
}

/// Run every check against the site.
///
/// Languages whose external bundle fails to load are checked for parity and
/// resolution against the embedded snapshot, mirroring what a localization
/// run would actually use.
pub fn check(
    site_root: &Path,
    config: &LocalizeConfig,
    source: &dyn BundleSource,
) -> Result<CheckReport, CheckError> {
    let langs = config.enabled_languages();
    let mut report = CheckReport::default();

    // Effective bundle per language: external when loadable, embedded otherwise
    let mut effective: Vec<(Lang, Bundle)> = Vec::new();
    for &lang in &langs {
        match source.fetch(lang) {
            Ok(external) => {
                report.bundles.push(BundleCheck {
                    lang,
                    load_error: None,
                    drift: external.diff(&bundle::embedded(lang)),
                });
                effective.push((lang, external));
            }
            Err(err) => {
                report.bundles.push(BundleCheck {
                    lang,
                    load_error: Some(err.to_string()),
                    drift: Vec::new(),
                });
                effective.push((lang, bundle::embedded(lang)));
            }
        }
    }

    for (a, bundle_a) in &effective {
        for (b, bundle_b) in &effective {
            if a == b {
                continue;
            }
            let keys = bundle_a.missing_from(bundle_b);
            if !keys.is_empty() {
                report.parity.push(ParityGap {
                    present_in: *a,
                    missing_from: *b,
                    keys,
                });
            }
        }
    }

    let inventory = scan::scan(site_root, config)?;
    for key in inventory.referenced_keys() {
        for (lang, bundle) in &effective {
            if bundle.resolve(&key).is_none() {
                report.unresolved.push(UnresolvedKey {
                    lang: *lang,
                    key: key.clone(),
                });
            }
        }
    }

    Ok(report)
}

/// Write the embedded snapshot bundles into a locales directory.
///
/// This is the `sync` subcommand: it repairs drift by making the external
/// files match the compiled-in copies. Refuses to overwrite existing files
/// unless `force` is set.
pub fn export_embedded(dir: &Path, force: bool) -> Result<Vec<String>, CheckError> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for lang in Lang::ALL {
        let path = dir.join(format!("{}.json", lang.code()));
        if path.exists() && !force {
            return Err(CheckError::WouldOverwrite(path.display().to_string()));
        }
        let mut json = bundle::embedded(lang).to_json_pretty();
        json.push('\n');
        fs::write(&path, json)?;
        written.push(format!("{}.json", lang.code()));
    }
    Ok(written)
}
