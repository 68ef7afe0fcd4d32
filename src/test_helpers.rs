//! Shared test fixtures: a small bilingual site in a temp directory.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::bundle;
use crate::lang::Lang;

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

/// Build a site fixture: two pages, a stylesheet, and locale bundles that
/// exactly match the embedded snapshot.
pub fn setup_site() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write(dir.path(), "index.html", INDEX_HTML);
    write(dir.path(), "catalog/index.html", CATALOG_HTML);
    write(dir.path(), "assets/css/style.css", "body { margin: 0; }\n");
    write(dir.path(), "assets/css/rtl.css", "body.rtl { direction: rtl; }\n");
    for lang in Lang::ALL {
        let mut json = bundle::embedded(lang).to_json_pretty();
        json.push('\n');
        write(
            dir.path(),
            &format!("assets/locales/{}.json", lang.code()),
            &json,
        );
    }
    dir
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("Failed to create {}: {e}", parent.display()));
    }
    fs::write(&path, content).unwrap_or_else(|e| panic!("Failed to write {rel}: {e}"));
}
