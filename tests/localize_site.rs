//! End-to-end localization tests: fixture site in, localized trees out.

use std::fs;
use std::path::{Path, PathBuf};

use sitelang::check;
use sitelang::config::LocalizeConfig;
use sitelang::lang::Lang;
use sitelang::localize;
use sitelang::source::Provenance;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en" dir="ltr">
<head>
    <meta charset="UTF-8">
    <title data-i18n="page.title">Davidov Beauty Care</title>
    <link rel="stylesheet" href="assets/css/style.css">
</head>
<body class="home ltr">
    <nav>
        <a href="/" data-i18n="nav.home">Home</a>
        <a href="/catalog/" data-i18n="nav.catalog">Catalog</a>
        <a href="/contact/" data-i18n="nav.contact">Contact</a>
    </nav>
    <input type="text" data-i18n-placeholder="search.placeholder" placeholder="Search equipment...">
    <img src="assets/hero.jpg" data-i18n-alt="hero.title" alt="Hero">
    <div class="language-switcher">
        <button class="lang-btn active" data-lang="en">English</button>
        <button class="lang-btn" data-lang="he">עברית</button>
    </div>
</body>
</html>
"#;

const CATALOG_HTML: &str = r#"<!DOCTYPE html>
<html lang="en" dir="ltr">
<head>
    <title data-i18n="page.title">Davidov Beauty Care</title>
</head>
<body class="catalog ltr">
    <h1 data-i18n="nav.catalog">Catalog</h1>
    <button data-i18n-title="cta.viewDetails" title="View Details">+</button>
</body>
</html>
"#;

const EN_BUNDLE: &str = r#"{
    "page": { "title": "Davidov Beauty Care - Professional Equipment" },
    "nav": { "home": "Home", "catalog": "Catalog", "contact": "Contact" },
    "search": { "placeholder": "Search equipment..." },
    "cta": { "viewDetails": "View Details" },
    "hero": { "title": "Advanced Technology" }
}"#;

const HE_BUNDLE: &str = r#"{
    "page": { "title": "דוידוב טיפוח יופי - ציוד מקצועי" },
    "nav": { "home": "בית", "catalog": "קטלוג", "contact": "צור קשר" },
    "search": { "placeholder": "חיפוש ציוד..." },
    "cta": { "viewDetails": "צפה בפרטים" },
    "hero": { "title": "טכנולוגיה מתקדמת" }
}"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn setup_site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "index.html", INDEX_HTML);
    write(dir.path(), "catalog/index.html", CATALOG_HTML);
    write(dir.path(), "assets/css/style.css", "body { margin: 0; }\n");
    write(dir.path(), "assets/css/rtl.css", "body.rtl { direction: rtl; }\n");
    write(dir.path(), "assets/locales/en.json", EN_BUNDLE);
    write(dir.path(), "assets/locales/he.json", HE_BUNDLE);
    dir
}

fn run_localize(site: &Path) -> (PathBuf, localize::SiteReport) {
    let output = site.join("dist");
    let config = LocalizeConfig::load(site).unwrap();
    let report = localize::localize(site, &output, &config).unwrap();
    (output, report)
}

#[test]
fn localize_emits_complete_trees_for_both_languages() {
    let site = setup_site();
    let (output, report) = run_localize(site.path());

    assert_eq!(report.page_count, 2);
    assert_eq!(report.langs.len(), 2);
    for code in ["en", "he"] {
        assert!(output.join(code).join("index.html").is_file());
        assert!(output.join(code).join("catalog/index.html").is_file());
        assert!(output.join(code).join("assets/css/rtl.css").is_file());
    }
    // Default language also served at the output root
    assert!(output.join("index.html").is_file());
}

#[test]
fn hebrew_pages_are_translated_and_rtl() {
    let site = setup_site();
    let (output, _) = run_localize(site.path());
    let html = fs::read_to_string(output.join("he/index.html")).unwrap();

    assert!(html.contains(r#"dir="rtl""#));
    assert!(html.contains(r#"lang="he""#));
    assert!(html.contains(r#"class="home rtl""#));
    assert!(html.contains(r#"id="rtl-styles""#));
    assert!(html.contains(">בית</a>"));
    // The visible attribute is rewritten while the marker keeps its key
    assert!(html.contains(r#" placeholder="חיפוש ציוד...""#));
    assert!(html.contains(r#"data-i18n-placeholder="search.placeholder""#));
    assert!(html.contains(r#" alt="טכנולוגיה מתקדמת""#));
    assert!(html.contains(r#"data-i18n-alt="hero.title""#));
    assert!(html.contains("<title data-i18n=\"page.title\">דוידוב טיפוח יופי - ציוד מקצועי</title>"));
    // Switcher reflects the emitted language
    assert!(html.contains(r#"<button class="lang-btn active" data-lang="he">"#));
    assert!(html.contains(r#"<button class="lang-btn" data-lang="en">"#));
}

#[test]
fn english_pages_stay_ltr_without_rtl_stylesheet() {
    let site = setup_site();
    let (output, _) = run_localize(site.path());
    let html = fs::read_to_string(output.join("en/index.html")).unwrap();

    assert!(html.contains(r#"dir="ltr""#));
    assert!(html.contains(r#"lang="en""#));
    assert!(!html.contains("rtl-styles"));
    assert!(html.contains(">Home</a>"));
}

#[test]
fn localize_is_deterministic_across_runs() {
    let site = setup_site();
    let (output, _) = run_localize(site.path());
    let first = fs::read_to_string(output.join("he/index.html")).unwrap();
    let (_, _) = run_localize(site.path());
    let second = fs::read_to_string(output.join("he/index.html")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_bundle_falls_back_to_embedded_snapshot() {
    let site = setup_site();
    fs::remove_file(site.path().join("assets/locales/he.json")).unwrap();
    let (output, report) = run_localize(site.path());

    let he = report.langs.iter().find(|l| l.lang == Lang::He).unwrap();
    assert_eq!(he.provenance, Provenance::Embedded);
    // The embedded bundle still produces a translated RTL page
    let html = fs::read_to_string(output.join("he/index.html")).unwrap();
    assert!(html.contains(r#"dir="rtl""#));
    assert!(html.contains("בית"));
}

#[test]
fn unresolved_key_renders_as_literal_key_and_is_reported() {
    let site = setup_site();
    let index = site.path().join("index.html");
    let html = fs::read_to_string(&index)
        .unwrap()
        .replace("</nav>", "<a href=\"/team/\" data-i18n=\"nav.team\">Team</a></nav>");
    fs::write(&index, html).unwrap();

    // nav.team is not in the fixture bundles
    let (output, report) = run_localize(site.path());
    let emitted = fs::read_to_string(output.join("he/index.html")).unwrap();
    assert!(emitted.contains(">nav.team</a>"));
    let he = report.langs.iter().find(|l| l.lang == Lang::He).unwrap();
    let page = he.pages.iter().find(|p| p.rel_path == "index.html").unwrap();
    assert!(page.missing.contains(&"nav.team".to_string()));
}

#[test]
fn check_flags_drift_and_parity_on_edited_bundles() {
    let site = setup_site();
    // Drop a key from the Hebrew bundle only
    let he = site.path().join("assets/locales/he.json");
    let text = fs::read_to_string(&he)
        .unwrap()
        .replace(r#", "contact": "צור קשר""#, "");
    fs::write(&he, text).unwrap();

    let config = LocalizeConfig::load(site.path()).unwrap();
    let source = localize::build_source(site.path(), &config);
    let report = check::check(site.path(), &config, source.as_ref()).unwrap();

    assert!(!report.is_clean());
    assert!(report.parity.iter().any(|gap| {
        gap.present_in == Lang::En
            && gap.missing_from == Lang::He
            && gap.keys.contains(&"nav.contact".to_string())
    }));
    // The page references nav.contact, so it is unresolved for Hebrew
    assert!(report
        .unresolved
        .iter()
        .any(|u| u.lang == Lang::He && u.key == "nav.contact"));
}

#[test]
fn sync_rewrites_bundles_from_the_embedded_snapshot() {
    let site = setup_site();
    let locales = site.path().join("assets/locales");
    fs::remove_file(locales.join("en.json")).unwrap();
    fs::remove_file(locales.join("he.json")).unwrap();

    let written = check::export_embedded(&locales, false).unwrap();
    assert_eq!(written.len(), 2);

    let config = LocalizeConfig::load(site.path()).unwrap();
    let source = localize::build_source(site.path(), &config);
    let report = check::check(site.path(), &config, source.as_ref()).unwrap();
    for bundle in &report.bundles {
        assert!(bundle.load_error.is_none());
        assert!(bundle.drift.is_empty());
    }
}
