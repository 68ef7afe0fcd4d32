//! HTML page backend for the [`Document`] trait.
//!
//! Pages opt nodes into translation with marker attributes:
//!
//! ```html
//! <a href="/" data-i18n="nav.home">Home</a>
//! <input data-i18n-placeholder="search.placeholder" placeholder="Search...">
//! <button data-i18n-title="cta.viewDetails" title="View Details">…</button>
//! <img src="hero.jpg" data-i18n-alt="hero.title" alt="...">
//! <title data-i18n="page.title">…</title>
//! ```
//!
//! Rewriting is regex-based over the page source. The one authoring
//! constraint this imposes: elements carrying `data-i18n` must contain
//! plain text only (no child elements), which is how marker elements are
//! written throughout the site. Attribute markers have no such constraint.
//!
//! Direction handling sets `dir`/`lang` on `<html>`, toggles the `rtl`/
//! `ltr` class on `<body>`, and inserts or removes the RTL stylesheet link
//! (`<link id="rtl-styles">`) in `<head>`. All operations are idempotent.

use regex::{Captures, Regex};

use crate::document::{Document, Edit, MarkerKind, TranslatableNode};
use crate::lang::{Direction, Lang};

/// Element id of the RTL stylesheet link.
const RTL_LINK_ID: &str = "rtl-styles";

/// Switcher buttons carry this class plus a `data-lang` attribute.
const SWITCHER_CLASS: &str = "lang-btn";

/// Matches any opening tag: name in group 1, attribute text in group 2.
/// Quoted attribute values may contain `>`.
const TAG_PATTERN: &str = r#"<([a-zA-Z][a-zA-Z0-9-]*)((?:"[^"]*"|'[^']*'|[^>"'])*)>"#;

fn tag_regex() -> Regex {
    Regex::new(TAG_PATTERN).expect("tag pattern is valid")
}

/// A single HTML page being localized.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    html: String,
    rtl_stylesheet_href: String,
}

impl HtmlPage {
    pub fn new(html: impl Into<String>, rtl_stylesheet_href: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            rtl_stylesheet_href: rtl_stylesheet_href.into(),
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

impl Document for HtmlPage {
    fn scan(&self) -> Vec<TranslatableNode> {
        let mut nodes = Vec::new();
        for caps in tag_regex().captures_iter(&self.html) {
            let tag = caps.get(1).map_or("", |m| m.as_str());
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            for kind in [
                MarkerKind::Text,
                MarkerKind::Placeholder,
                MarkerKind::Title,
                MarkerKind::Alt,
            ] {
                if let Some(key) = marker_key(attrs, kind.attr()) {
                    let kind = if kind == MarkerKind::Text && tag.eq_ignore_ascii_case("title") {
                        MarkerKind::DocumentTitle
                    } else {
                        kind
                    };
                    nodes.push(TranslatableNode {
                        kind,
                        key: key.to_string(),
                    });
                }
            }
        }
        nodes
    }

    fn apply(&mut self, edits: &[Edit]) {
        for edit in edits {
            self.html = match edit.kind {
                MarkerKind::Text => set_marked_text(&self.html, &edit.key, &edit.value, false),
                MarkerKind::DocumentTitle => {
                    set_marked_text(&self.html, &edit.key, &edit.value, true)
                }
                MarkerKind::Placeholder => {
                    set_marked_attr(&self.html, MarkerKind::Placeholder, &edit.key, "placeholder", &edit.value)
                }
                MarkerKind::Title => {
                    set_marked_attr(&self.html, MarkerKind::Title, &edit.key, "title", &edit.value)
                }
                MarkerKind::Alt => {
                    set_marked_attr(&self.html, MarkerKind::Alt, &edit.key, "alt", &edit.value)
                }
            };
        }
    }

    fn set_direction(&mut self, direction: Direction, lang: Lang) {
        self.html = rewrite_tag(&self.html, "html", |tag| {
            let tag = set_attr_in_tag(tag, "dir", direction.as_attr());
            set_attr_in_tag(&tag, "lang", lang.code())
        });
        let (add, remove) = match direction {
            Direction::Rtl => ("rtl", "ltr"),
            Direction::Ltr => ("ltr", "rtl"),
        };
        self.html = rewrite_tag(&self.html, "body", |tag| {
            let tag = edit_class_list(tag, add, true);
            edit_class_list(&tag, remove, false)
        });
    }

    fn set_rtl_stylesheet(&mut self, present: bool) {
        let link_re = Regex::new(&format!(
            r#"[ \t]*<link(?:"[^"]*"|'[^']*'|[^>"'])*\bid="{RTL_LINK_ID}"(?:"[^"]*"|'[^']*'|[^>"'])*>\r?\n?"#
        ))
        .expect("rtl link pattern is valid");
        let already = link_re.is_match(&self.html);
        match (present, already) {
            (true, false) => {
                let link = format!(
                    "    <link id=\"{RTL_LINK_ID}\" rel=\"stylesheet\" href=\"{}\">\n",
                    escape_attr(&self.rtl_stylesheet_href)
                );
                let head_close = Regex::new(r"(?i)</head>").expect("head pattern is valid");
                if head_close.is_match(&self.html) {
                    let replacement = format!("{link}</head>");
                    self.html = head_close
                        .replace(&self.html, regex::NoExpand(&replacement))
                        .into_owned();
                } else {
                    // Headless fragment: prepend so the stylesheet still loads
                    self.html = format!("{link}{}", self.html);
                }
            }
            (false, true) => {
                self.html = link_re.replace_all(&self.html, "").into_owned();
            }
            _ => {}
        }
    }

    fn set_active_switcher(&mut self, lang: Lang) {
        self.html = tag_regex()
            .replace_all(&self.html, |caps: &Captures<'_>| {
                let whole = caps.get(0).map_or("", |m| m.as_str());
                let attrs = caps.get(2).map_or("", |m| m.as_str());
                let Some(code) = marker_key(attrs, "data-lang") else {
                    return whole.to_string();
                };
                if !class_list(attrs).iter().any(|c| c == SWITCHER_CLASS) {
                    return whole.to_string();
                }
                edit_class_list(whole, "active", code == lang.code())
            })
            .into_owned();
    }
}

/// Extract `attr="value"` from a tag's attribute text.
fn marker_key<'a>(attrs: &'a str, attr: &str) -> Option<&'a str> {
    let re = Regex::new(&format!(r#"(?:^|\s){}="([^"]*)""#, regex::escape(attr)))
        .expect("marker pattern is valid");
    re.captures(attrs).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Replace the text content of every element marked `data-i18n="key"`.
///
/// `title_element` selects between the `<title>` element (document title)
/// and every other element (plain text content).
fn set_marked_text(html: &str, key: &str, value: &str, title_element: bool) -> String {
    let re = Regex::new(r#"(<([a-zA-Z][a-zA-Z0-9-]*)((?:"[^"]*"|'[^']*'|[^>"'])*)>)([^<]*)"#)
        .expect("text pattern is valid");
    re.replace_all(html, |caps: &Captures<'_>| {
        let open = caps.get(1).map_or("", |m| m.as_str());
        let tag = caps.get(2).map_or("", |m| m.as_str());
        let attrs = caps.get(3).map_or("", |m| m.as_str());
        let inner = caps.get(4).map_or("", |m| m.as_str());
        let is_title = tag.eq_ignore_ascii_case("title");
        if is_title == title_element && marker_key(attrs, "data-i18n") == Some(key) {
            format!("{open}{}", escape_text(value))
        } else {
            format!("{open}{inner}")
        }
    })
    .into_owned()
}

/// Set `target` on every tag marked `marker="key"`, creating the attribute
/// when absent.
fn set_marked_attr(html: &str, marker: MarkerKind, key: &str, target: &str, value: &str) -> String {
    tag_regex()
        .replace_all(html, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            if marker_key(attrs, marker.attr()) == Some(key) {
                set_attr_in_tag(whole, target, value)
            } else {
                whole.to_string()
            }
        })
        .into_owned()
}

/// Rewrite the first `<name ...>` tag with `edit`.
fn rewrite_tag(html: &str, name: &str, edit: impl Fn(&str) -> String) -> String {
    let re = Regex::new(&format!(
        r#"(?i)<{}\b(?:"[^"]*"|'[^']*'|[^>"'])*>"#,
        regex::escape(name)
    ))
    .expect("tag name pattern is valid");
    re.replace(html, |caps: &Captures<'_>| {
        edit(caps.get(0).map_or("", |m| m.as_str()))
    })
    .into_owned()
}

/// Set an attribute inside a single tag's text, replacing an existing value
/// or inserting before the closing bracket.
///
/// The match requires whitespace before the attribute name so that `alt`
/// never matches inside `data-i18n-alt` (and likewise for the other marker
/// attributes).
fn set_attr_in_tag(tag: &str, attr: &str, value: &str) -> String {
    let value = escape_attr(value);
    let existing = Regex::new(&format!(r#"(\s){}="[^"]*""#, regex::escape(attr)))
        .expect("attr pattern is valid");
    if existing.is_match(tag) {
        return existing
            .replace(tag, |caps: &Captures<'_>| {
                format!(r#"{}{attr}="{value}""#, &caps[1])
            })
            .into_owned();
    }
    let insertion = format!(r#" {attr}="{value}""#);
    if let Some(stripped) = tag.strip_suffix("/>") {
        format!("{}{insertion}/>", stripped.trim_end())
    } else if let Some(stripped) = tag.strip_suffix('>') {
        format!("{stripped}{insertion}>")
    } else {
        tag.to_string()
    }
}

/// Classes declared in a tag's attribute text.
fn class_list(attrs: &str) -> Vec<String> {
    marker_key(attrs, "class")
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Add or remove a class on a single tag, preserving the others.
fn edit_class_list(tag: &str, class: &str, present: bool) -> String {
    let re = Regex::new(r#"(\s)class="([^"]*)""#).expect("class pattern is valid");
    if let Some(caps) = re.captures(tag) {
        let mut classes: Vec<&str> = caps
            .get(2)
            .map_or("", |m| m.as_str())
            .split_whitespace()
            .filter(|c| *c != class)
            .collect();
        if present {
            classes.push(class);
        }
        let joined = classes.join(" ");
        re.replace(tag, |caps: &Captures<'_>| {
            format!(r#"{}class="{joined}""#, &caps[1])
        })
        .into_owned()
    } else if present {
        set_attr_in_tag(tag, "class", class)
    } else {
        tag.to_string()
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
