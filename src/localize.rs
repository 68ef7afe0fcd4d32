//! Site localization: emit one translated page tree per enabled language.
//!
//! Stage 2 of the pipeline. For every enabled language this loads the
//! language's bundle once (through the configured [`BundleSource`], with
//! embedded fallback), then rewrites every page in parallel and writes the
//! result under `output/{code}/`. The default language is additionally
//! written at the output root, so the untranslated URL keeps working.
//!
//! Non-HTML files (stylesheets, images, scripts) are copied into each
//! emitted tree unchanged, so every tree is a self-contained site.
//!
//! ```text
//! dist/
//! ├── index.html            # default language
//! ├── assets/...
//! ├── en/
//! │   ├── index.html
//! │   └── assets/...
//! └── he/
//!     ├── index.html        # dir="rtl", rtl stylesheet linked
//!     └── assets/...
//! ```

use std::fs;
use std::path::Path;

use rayon::prelude::*;
use thiserror::Error;
use walkdir::WalkDir;

use crate::bundle::Bundle;
use crate::config::LocalizeConfig;
use crate::document::apply_language;
use crate::html::HtmlPage;
use crate::lang::Lang;
use crate::prefs::MemoryPreferenceStore;
use crate::scan::{self, PageFile, ScanError};
use crate::source::{BundleSource, FileSource, HttpSource, Provenance};
use crate::translator::Translator;

#[derive(Error, Debug)]
pub enum LocalizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

/// One localized page as emitted.
#[derive(Debug, Clone)]
pub struct PageReport {
    pub rel_path: String,
    /// Markers found and written.
    pub applied: usize,
    /// Keys the bundle could not resolve (emitted as literal key text).
    pub missing: Vec<String>,
}

/// One emitted language tree.
#[derive(Debug, Clone)]
pub struct LangReport {
    pub lang: Lang,
    /// Whether the bundle came from the configured source or the embedded
    /// fallback.
    pub provenance: Provenance,
    pub pages: Vec<PageReport>,
}

impl LangReport {
    pub fn missing_total(&self) -> usize {
        self.pages.iter().map(|p| p.missing.len()).sum()
    }
}

/// The whole localization run.
#[derive(Debug, Clone)]
pub struct SiteReport {
    pub langs: Vec<LangReport>,
    /// Pages found in the source tree.
    pub page_count: usize,
    /// Non-HTML files copied into each tree.
    pub assets_copied: usize,
}

/// The bundle source the config asks for: HTTP when `remote_url` is set,
/// otherwise the local locales directory.
pub fn build_source(site_root: &Path, config: &LocalizeConfig) -> Box<dyn BundleSource> {
    if config.locales.remote_url.is_empty() {
        Box::new(FileSource::new(site_root.join(&config.locales.dir)))
    } else {
        Box::new(HttpSource::with_timeout(
            config.locales.remote_url.clone(),
            std::time::Duration::from_secs(config.locales.fetch_timeout_secs),
        ))
    }
}

/// Localize the site into `output_root`.
pub fn localize(
    site_root: &Path,
    output_root: &Path,
    config: &LocalizeConfig,
) -> Result<SiteReport, LocalizeError> {
    let exclude = output_root
        .starts_with(site_root)
        .then(|| output_root.to_path_buf());
    let pages = scan::collect_pages(site_root, exclude.as_deref())?;

    let mut translator = Translator::new(
        build_source(site_root, config),
        Box::new(MemoryPreferenceStore::default()),
    );

    let default = config.default_language();
    let mut langs = Vec::new();
    let mut assets_copied = 0;
    for lang in config.enabled_languages() {
        translator.set_language(lang);
        let bundle = translator
            .bundle()
            .expect("set_language always leaves a bundle loaded");

        let lang_root = output_root.join(lang.code());
        let mut reports = emit_pages(&pages, bundle, lang, &lang_root, config)?;
        assets_copied = copy_assets(site_root, &lang_root, exclude.as_deref(), config)?;
        if default == Some(lang) {
            reports = emit_pages(&pages, bundle, lang, output_root, config)?;
            copy_assets(site_root, output_root, exclude.as_deref(), config)?;
        }
        log::info!(
            "localized {} pages for {} ({} bundle)",
            reports.len(),
            lang.code(),
            match translator.provenance() {
                Provenance::Source => "source",
                Provenance::Embedded => "embedded",
            }
        );
        langs.push(LangReport {
            lang,
            provenance: translator.provenance(),
            pages: reports,
        });
    }

    Ok(SiteReport {
        langs,
        page_count: pages.len(),
        assets_copied,
    })
}

/// Rewrite every page for one language, in parallel, into `target_root`.
fn emit_pages(
    pages: &[PageFile],
    bundle: &Bundle,
    lang: Lang,
    target_root: &Path,
    config: &LocalizeConfig,
) -> Result<Vec<PageReport>, LocalizeError> {
    pages
        .par_iter()
        .map(|page| {
            let mut doc = HtmlPage::new(page.text.as_str(), config.rtl.stylesheet_href.as_str());
            let report = apply_language(&mut doc, bundle, lang);
            let dest = target_root.join(&page.rel_path);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&dest, doc.html())?;
            Ok(PageReport {
                rel_path: page.rel_path.clone(),
                applied: report.applied,
                missing: report.missing,
            })
        })
        .collect()
}

/// Copy every non-HTML file into `target_root`, preserving relative paths.
///
/// Skips the output tree (when nested), the config file, and the preference
/// file. Returns the number of files copied.
fn copy_assets(
    site_root: &Path,
    target_root: &Path,
    exclude: Option<&Path>,
    config: &LocalizeConfig,
) -> Result<usize, LocalizeError> {
    let skip_names = ["localize.toml", config.preference.file.as_str()];
    let mut copied = 0;
    let walker = WalkDir::new(site_root)
        .into_iter()
        .filter_entry(|entry| exclude.is_none_or(|ex| entry.path() != ex));
    for entry in walker {
        let entry = entry.map_err(ScanError::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("html"))
        {
            continue;
        }
        let rel = path.strip_prefix(site_root).unwrap_or(path);
        if rel
            .to_str()
            .is_some_and(|r| skip_names.contains(&r))
        {
            continue;
        }
        let dest = target_root.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)?;
        copied += 1;
    }
    Ok(copied)
}
