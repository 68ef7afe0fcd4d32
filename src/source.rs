//! Locale bundle loading with an explicit fallback policy.
//!
//! [`BundleSource`] abstracts where bundles come from — the site's locales
//! directory, a remote base URL, or a test double — so the translator can be
//! constructed in isolation. Loading returns `Result<Bundle, LoadError>`;
//! the recovery policy lives in [`load_with_fallback`], which converts every
//! failure (I/O, HTTP, timeout, malformed shape) into the embedded snapshot
//! and records that choice in [`Provenance`] so reports can surface it.
//!
//! No failure in this module ever reaches a page: the fallback chain always
//! ends at the compiled-in bundle.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::bundle::{self, Bundle, BundleError};
use crate::lang::Lang;

/// Default network timeout for remote bundle fetches.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors arising while fetching an external locale bundle.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading the locale file failed.
    #[error("cannot read locale file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote resource returned a non-success status.
    #[error("locale fetch returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The HTTP request itself failed (DNS, connect, timeout).
    #[error("locale fetch failed for {url}: {reason}")]
    Http { url: String, reason: String },

    /// The resource was fetched but is not a valid bundle.
    #[error("malformed locale bundle: {0}")]
    Malformed(#[from] BundleError),
}

/// Where the active bundle actually came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Loaded from the configured external source.
    Source,
    /// External load failed; the embedded snapshot is in use.
    Embedded,
}

/// Trait for fetching the external locale resource for a language.
///
/// Abstracting the fetch lets tests exercise failure paths without a
/// network or filesystem.
pub trait BundleSource {
    /// Fetch and parse the bundle for `lang`.
    ///
    /// # Errors
    ///
    /// Returns an error when the resource is unreachable, unreadable, or
    /// not a valid nested string mapping.
    fn fetch(&self, lang: Lang) -> Result<Bundle, LoadError>;
}

/// Reads `{code}.json` from a locales directory on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the bundle file for a language.
    pub fn bundle_path(&self, lang: Lang) -> PathBuf {
        self.dir.join(format!("{}.json", lang.code()))
    }
}

impl BundleSource for FileSource {
    fn fetch(&self, lang: Lang) -> Result<Bundle, LoadError> {
        let path = self.bundle_path(lang);
        let text = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Bundle::from_json(&text)?)
    }
}

/// Fetches `{base_url}/{code}.json` over HTTP.
#[derive(Clone)]
pub struct HttpSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_FETCH_TIMEOUT)
    }

    /// Source with an explicit fetch timeout, applied globally per request.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            base_url,
            agent: ureq::Agent::new_with_config(config),
        }
    }

    /// URL of the bundle resource for a language.
    pub fn bundle_url(&self, lang: Lang) -> String {
        format!("{}/{}.json", self.base_url, lang.code())
    }
}

impl BundleSource for HttpSource {
    fn fetch(&self, lang: Lang) -> Result<Bundle, LoadError> {
        let url = self.bundle_url(lang);
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| map_ureq_error(&url, &e))?;
        let text = response
            .into_body()
            .read_to_string()
            .map_err(|e| LoadError::Http {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        Ok(Bundle::from_json(&text)?)
    }
}

/// Map a ureq error to a [`LoadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> LoadError {
    match err {
        ureq::Error::StatusCode(status) => LoadError::Status {
            url: url.to_owned(),
            status: *status,
        },
        other => LoadError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

/// Load a bundle, falling back to the embedded snapshot on any failure.
///
/// This is the single place the recovery policy is chosen: the caller gets
/// a bundle unconditionally, plus the provenance telling it whether the
/// external resource was actually used. Failures are logged, never raised.
pub fn load_with_fallback(source: &dyn BundleSource, lang: Lang) -> (Bundle, Provenance) {
    match source.fetch(lang) {
        Ok(bundle) => (bundle, Provenance::Source),
        Err(err) => {
            log::warn!("locale load failed for {lang}, using embedded bundle: {err}");
            (bundle::embedded(lang), Provenance::Embedded)
        }
    }
}
