//! CLI output formatting for all pipeline stages.
//!
//! Output leads with the semantic identity of each entity — page path,
//! language code, dotted key — with detail shown as indented context lines.
//!
//! ## Scan
//!
//! ```text
//! Pages
//! index.html (5 markers)
//!     text: 3
//!     placeholder: 1
//!     document title: 1
//!
//! 6 markers across 2 pages, 5 distinct keys
//! ```
//!
//! ## Localize
//!
//! ```text
//! en (source bundle)
//!     index.html → en/index.html
//!     catalog/index.html → en/catalog/index.html
//! he (embedded bundle)
//!     index.html → he/index.html
//!         missing: footer.newKey
//!
//! Localized 2 pages into 2 languages, 7 assets copied
//! ```
//!
//! ## Check
//!
//! ```text
//! Bundles
//!     en: ok
//!     he: ok, 1 drift
//!         nav.home: embedded and external values differ
//! Parity
//!     en keys missing from he:
//!         nav.pricing
//! Unresolved keys
//!     footer.newKey (he)
//!
//! 3 problems found
//! ```
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::check::CheckReport;
use crate::document::MarkerKind;
use crate::localize::SiteReport;
use crate::scan::ScanReport;
use crate::source::Provenance;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn provenance_label(provenance: Provenance) -> &'static str {
    match provenance {
        Provenance::Source => "source bundle",
        Provenance::Embedded => "embedded bundle",
    }
}

fn plural(n: usize, singular: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {singular}s")
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing the marker inventory per page.
pub fn format_scan_output(report: &ScanReport) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Pages".to_string());
    for page in &report.pages {
        lines.push(format!(
            "{} ({})",
            page.rel_path,
            plural(page.nodes.len(), "marker")
        ));
        for kind in MarkerKind::ALL {
            let count = page.count(kind);
            if count > 0 {
                lines.push(format!("{}{}: {}", indent(1), kind.label(), count));
            }
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "{} across {}, {} distinct keys",
        plural(report.total_markers(), "marker"),
        plural(report.pages.len(), "page"),
        report.referenced_keys().len()
    ));
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(report: &ScanReport) {
    for line in format_scan_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Localize output
// ============================================================================

/// Format localize stage output: one section per emitted language tree.
pub fn format_localize_output(report: &SiteReport) -> Vec<String> {
    let mut lines = Vec::new();
    for lang in &report.langs {
        lines.push(format!(
            "{} ({})",
            lang.lang.code(),
            provenance_label(lang.provenance)
        ));
        for page in &lang.pages {
            lines.push(format!(
                "{}{} \u{2192} {}/{}",
                indent(1),
                page.rel_path,
                lang.lang.code(),
                page.rel_path
            ));
            for key in &page.missing {
                lines.push(format!("{}missing: {}", indent(2), key));
            }
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "Localized {} into {}, {} copied",
        plural(report.page_count, "page"),
        plural(report.langs.len(), "language"),
        plural(report.assets_copied, "asset")
    ));
    lines
}

/// Print localize output to stdout.
pub fn print_localize_output(report: &SiteReport) {
    for line in format_localize_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 3: Check output
// ============================================================================

/// Format check stage output: bundle health, parity, unresolved keys.
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Bundles".to_string());
    for bundle in &report.bundles {
        match &bundle.load_error {
            Some(err) => {
                lines.push(format!("{}{}: {}", indent(1), bundle.lang.code(), err));
            }
            None if bundle.drift.is_empty() => {
                lines.push(format!("{}{}: ok", indent(1), bundle.lang.code()));
            }
            None => {
                lines.push(format!(
                    "{}{}: ok, {}",
                    indent(1),
                    bundle.lang.code(),
                    plural(bundle.drift.len(), "drift")
                ));
                for drift in &bundle.drift {
                    lines.push(format!("{}{}", indent(2), drift));
                }
            }
        }
    }

    if !report.parity.is_empty() {
        lines.push("Parity".to_string());
        for gap in &report.parity {
            lines.push(format!(
                "{}{} keys missing from {}:",
                indent(1),
                gap.present_in.code(),
                gap.missing_from.code()
            ));
            for key in &gap.keys {
                lines.push(format!("{}{}", indent(2), key));
            }
        }
    }

    if !report.unresolved.is_empty() {
        lines.push("Unresolved keys".to_string());
        for unresolved in &report.unresolved {
            lines.push(format!(
                "{}{} ({})",
                indent(1),
                unresolved.key,
                unresolved.lang.code()
            ));
        }
    }

    lines.push(String::new());
    if report.is_clean() {
        lines.push("All checks passed".to_string());
    } else {
        lines.push(format!("{} found", plural(report.problem_count(), "problem")));
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{BundleCheck, ParityGap, UnresolvedKey};
    use crate::document::TranslatableNode;
    use crate::lang::Lang;
    use crate::localize::{LangReport, PageReport};
    use crate::scan::PageMarkers;

    fn node(kind: MarkerKind, key: &str) -> TranslatableNode {
        TranslatableNode {
            kind,
            key: key.to_string(),
        }
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "    ");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "marker"), "1 marker");
        assert_eq!(plural(2, "marker"), "2 markers");
        assert_eq!(plural(0, "page"), "0 pages");
    }

    #[test]
    fn scan_output_groups_marker_kinds() {
        let report = ScanReport {
            pages: vec![PageMarkers {
                rel_path: "index.html".to_string(),
                nodes: vec![
                    node(MarkerKind::Text, "nav.home"),
                    node(MarkerKind::Text, "nav.catalog"),
                    node(MarkerKind::DocumentTitle, "page.title"),
                ],
            }],
        };
        let lines = format_scan_output(&report);
        assert_eq!(lines[0], "Pages");
        assert_eq!(lines[1], "index.html (3 markers)");
        assert_eq!(lines[2], "    text: 2");
        assert_eq!(lines[3], "    document title: 1");
        assert_eq!(
            lines.last().unwrap(),
            "3 markers across 1 page, 3 distinct keys"
        );
    }

    #[test]
    fn localize_output_shows_provenance_and_missing_keys() {
        let report = SiteReport {
            langs: vec![LangReport {
                lang: Lang::He,
                provenance: Provenance::Embedded,
                pages: vec![PageReport {
                    rel_path: "index.html".to_string(),
                    applied: 3,
                    missing: vec!["footer.newKey".to_string()],
                }],
            }],
            page_count: 1,
            assets_copied: 4,
        };
        let lines = format_localize_output(&report);
        assert_eq!(lines[0], "he (embedded bundle)");
        assert_eq!(lines[1], "    index.html \u{2192} he/index.html");
        assert_eq!(lines[2], "        missing: footer.newKey");
        assert_eq!(
            lines.last().unwrap(),
            "Localized 1 page into 1 language, 4 assets copied"
        );
    }

    #[test]
    fn check_output_clean_report() {
        let report = CheckReport {
            bundles: vec![BundleCheck {
                lang: Lang::En,
                load_error: None,
                drift: vec![],
            }],
            parity: vec![],
            unresolved: vec![],
        };
        let lines = format_check_output(&report);
        assert_eq!(lines[1], "    en: ok");
        assert_eq!(lines.last().unwrap(), "All checks passed");
    }

    #[test]
    fn check_output_counts_problems() {
        let report = CheckReport {
            bundles: vec![BundleCheck {
                lang: Lang::He,
                load_error: Some("cannot read locale file".to_string()),
                drift: vec![],
            }],
            parity: vec![ParityGap {
                present_in: Lang::En,
                missing_from: Lang::He,
                keys: vec!["nav.pricing".to_string()],
            }],
            unresolved: vec![UnresolvedKey {
                lang: Lang::He,
                key: "footer.newKey".to_string(),
            }],
        };
        let lines = format_check_output(&report);
        assert!(lines.contains(&"    he: cannot read locale file".to_string()));
        assert!(lines.contains(&"    en keys missing from he:".to_string()));
        assert!(lines.contains(&"        nav.pricing".to_string()));
        assert!(lines.contains(&"    footer.newKey (he)".to_string()));
        assert_eq!(lines.last().unwrap(), "3 problems found");
    }
}
