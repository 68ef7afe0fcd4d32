//! Page scanning and marker inventory.
//!
//! Stage 1 of the localization pipeline. Walks the site root for HTML
//! pages, extracts every translation marker, and produces an inventory the
//! other stages (and the `scan` subcommand's report) consume.
//!
//! ## Site Structure
//!
//! ```text
//! site/
//! ├── localize.toml            # Localization config (optional)
//! ├── index.html               # Pages: any *.html anywhere in the tree
//! ├── catalog/
//! │   └── index.html
//! ├── assets/
//! │   ├── locales/             # External bundles: en.json, he.json
//! │   │   ├── en.json
//! │   │   └── he.json
//! │   └── css/rtl.css          # Injected on RTL pages
//! └── .sitelang-pref           # Persisted language choice (optional)
//! ```
//!
//! Pages opt into translation per node via marker attributes (see
//! [`crate::html`]); pages without markers are still emitted, localized
//! only in direction and presentation.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::config::LocalizeConfig;
use crate::document::{Document, MarkerKind, TranslatableNode};
use crate::html::HtmlPage;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("site root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// One HTML page read from the site tree.
#[derive(Debug, Clone)]
pub struct PageFile {
    /// Path relative to the site root (forward slashes).
    pub rel_path: String,
    /// Raw page source.
    pub text: String,
}

/// Marker inventory for one page.
#[derive(Debug, Clone)]
pub struct PageMarkers {
    pub rel_path: String,
    pub nodes: Vec<TranslatableNode>,
}

impl PageMarkers {
    pub fn count(&self, kind: MarkerKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }
}

/// Inventory of every page in the site.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub pages: Vec<PageMarkers>,
}

impl ScanReport {
    pub fn total_markers(&self) -> usize {
        self.pages.iter().map(|p| p.nodes.len()).sum()
    }

    /// Every distinct key referenced by any page, sorted.
    pub fn referenced_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .pages
            .iter()
            .flat_map(|p| p.nodes.iter().map(|n| n.key.clone()))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

/// Collect every `*.html` page under the site root, sorted by path.
///
/// `exclude` (typically the output directory, when nested inside the site)
/// is skipped entirely.
pub fn collect_pages(site_root: &Path, exclude: Option<&Path>) -> Result<Vec<PageFile>, ScanError> {
    if !site_root.is_dir() {
        return Err(ScanError::NotADirectory(site_root.to_path_buf()));
    }
    let mut pages = Vec::new();
    let walker = WalkDir::new(site_root).into_iter().filter_entry(|entry| {
        exclude.is_none_or(|ex| entry.path() != ex)
    });
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_html = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("html"));
        if !is_html {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(site_root)
            .unwrap_or(entry.path());
        pages.push(PageFile {
            rel_path: rel_path_string(rel),
            text: fs::read_to_string(entry.path())?,
        });
    }
    pages.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(pages)
}

/// Scan the site and inventory every translation marker.
pub fn scan(site_root: &Path, config: &LocalizeConfig) -> Result<ScanReport, ScanError> {
    let pages = collect_pages(site_root, None)?;
    let report = ScanReport {
        pages: pages
            .iter()
            .map(|page| PageMarkers {
                rel_path: page.rel_path.clone(),
                nodes: HtmlPage::new(page.text.as_str(), config.rtl.stylesheet_href.as_str())
                    .scan(),
            })
            .collect(),
    };
    Ok(report)
}

fn rel_path_string(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
