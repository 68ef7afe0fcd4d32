//! Supported languages and locale negotiation.
//!
//! The site is strictly bilingual: English (LTR, the default) and Hebrew
//! (RTL). Language tags from the environment are matched leniently — any
//! Hebrew-family tag selects Hebrew, including the legacy `iw` alias still
//! reported by some platforms — and everything else resolves to English.
//!
//! Negotiation priority (first hit wins):
//!
//! 1. Persisted user preference (see [`crate::prefs`])
//! 2. The runtime's reported locale list (`sys-locale`)
//! 3. English

use unic_langid::LanguageIdentifier;

/// A supported site language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    En,
    He,
}

/// Text/layout direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    /// Value for the `dir` attribute on the document root.
    pub fn as_attr(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    /// Presentation class toggled on `<body>`.
    pub fn body_class(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl Lang {
    /// All supported languages, in site order (default first).
    pub const ALL: [Lang; 2] = [Lang::En, Lang::He];

    /// Short locale code used in bundle filenames, URLs, and the `lang`
    /// attribute.
    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::He => "he",
        }
    }

    /// Parse an exact locale code (`"en"` / `"he"`), as stored in config
    /// files and the preference file.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Lang::En),
            "he" => Some(Lang::He),
            _ => None,
        }
    }

    /// Classify a full BCP-47 tag like `"he-IL"` or `"en-US"`.
    ///
    /// Hebrew-family tags (`he`, and the legacy `iw` alias) map to Hebrew;
    /// every other parseable tag maps to English. Unparseable input yields
    /// `None` so negotiation can move on to the next tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let id: LanguageIdentifier = tag.trim().parse().ok()?;
        match id.language.as_str() {
            "he" | "iw" => Some(Lang::He),
            _ => Some(Lang::En),
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Lang::He)
    }

    pub fn direction(self) -> Direction {
        if self.is_rtl() {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }

    /// Native display name, shown on switcher buttons.
    pub fn display_name(self) -> &'static str {
        match self {
            Lang::En => "English",
            Lang::He => "עברית",
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Negotiate a language from the runtime's reported tag list.
///
/// The first tag that parses decides; a list with no usable tags falls back
/// to English. Mirrors browser-style negotiation where `navigator.language`
/// leads the list.
pub fn negotiate<I, S>(tags: I) -> Lang
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for tag in tags {
        if let Some(lang) = Lang::from_tag(tag.as_ref()) {
            return lang;
        }
    }
    Lang::En
}

/// Locale tags reported by the operating system, most preferred first.
pub fn system_tags() -> Vec<String> {
    sys_locale::get_locales().collect()
}
