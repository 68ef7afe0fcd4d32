//! Localization configuration.
//!
//! Handles loading and validating `localize.toml` from the site root. All
//! options are optional — config files are sparse, overriding only the
//! values they want:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [languages]
//! default = "en"            # Language served at the output root
//! enabled = ["en", "he"]    # Languages to emit (one tree per code)
//!
//! [locales]
//! dir = "assets/locales"    # Bundle files ({code}.json), relative to site root
//! remote_url = ""           # Optional HTTP base for bundles; empty = local only
//! fetch_timeout_secs = 5    # Timeout for remote bundle fetches
//!
//! [rtl]
//! stylesheet_href = "assets/css/rtl.css"  # Injected on RTL pages
//!
//! [preference]
//! file = ".sitelang-pref"   # Persisted language choice, relative to site root
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::lang::Lang;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `localize.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalizeConfig {
    /// Which languages to emit and which one is the default.
    pub languages: LanguagesConfig,
    /// Where locale bundles live.
    pub locales: LocalesConfig,
    /// RTL presentation wiring.
    pub rtl: RtlConfig,
    /// Persisted language preference.
    pub preference: PreferenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LanguagesConfig {
    /// Language served at the output root.
    pub default: String,
    /// Languages to emit, one output tree per code.
    pub enabled: Vec<String>,
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            default: "en".to_string(),
            enabled: vec!["en".to_string(), "he".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalesConfig {
    /// Bundle directory (`{code}.json` files), relative to the site root.
    pub dir: String,
    /// Optional HTTP base URL for bundles. Empty means local files only.
    pub remote_url: String,
    /// Timeout for remote bundle fetches, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for LocalesConfig {
    fn default() -> Self {
        Self {
            dir: "assets/locales".to_string(),
            remote_url: String::new(),
            fetch_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RtlConfig {
    /// Stylesheet href injected into RTL pages.
    pub stylesheet_href: String,
}

impl Default for RtlConfig {
    fn default() -> Self {
        Self {
            stylesheet_href: "assets/css/rtl.css".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreferenceConfig {
    /// File persisting the last chosen language, relative to the site root.
    pub file: String,
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self {
            file: ".sitelang-pref".to_string(),
        }
    }
}

impl LocalizeConfig {
    /// Load `localize.toml` from the site root, or defaults when absent.
    pub fn load(site_root: &Path) -> Result<Self, ConfigError> {
        let path = site_root.join("localize.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.enabled.is_empty() {
            return Err(ConfigError::Validation(
                "languages.enabled must not be empty".into(),
            ));
        }
        for code in &self.languages.enabled {
            if Lang::from_code(code).is_none() {
                return Err(ConfigError::Validation(format!(
                    "unsupported language code: {code:?} (supported: en, he)"
                )));
            }
        }
        if !self.languages.enabled.contains(&self.languages.default) {
            return Err(ConfigError::Validation(format!(
                "languages.default {:?} is not in languages.enabled",
                self.languages.default
            )));
        }
        if self.locales.dir.is_empty() {
            return Err(ConfigError::Validation(
                "locales.dir must not be empty".into(),
            ));
        }
        if self.locales.fetch_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "locales.fetch_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Enabled languages as typed values, default first, duplicates removed.
    ///
    /// Call after [`Self::validate`]; unsupported codes were rejected there.
    pub fn enabled_languages(&self) -> Vec<Lang> {
        let mut langs: Vec<Lang> = Vec::new();
        for code in &self.languages.enabled {
            if let Some(lang) = Lang::from_code(code) {
                if !langs.contains(&lang) {
                    langs.push(lang);
                }
            }
        }
        if let Some(default) = self.default_language() {
            if let Some(pos) = langs.iter().position(|l| *l == default) {
                langs.remove(pos);
                langs.insert(0, default);
            }
        }
        langs
    }

    pub fn default_language(&self) -> Option<Lang> {
        Lang::from_code(&self.languages.default)
    }
}

/// A documented stock `localize.toml` with every option and its default.
pub fn stock_config_toml() -> String {
    "\
# sitelang configuration. All options are optional; defaults shown.

[languages]
# Language served at the output root.
default = \"en\"
# Languages to emit. One output tree per code.
enabled = [\"en\", \"he\"]

[locales]
# Bundle files ({code}.json), relative to the site root.
dir = \"assets/locales\"
# Optional HTTP base URL for bundles. When set, bundles are fetched from
# {remote_url}/{code}.json and the local directory is not consulted.
# Any fetch failure falls back to the snapshot embedded in the binary.
remote_url = \"\"
# Timeout for remote bundle fetches, in seconds.
fetch_timeout_secs = 5

[rtl]
# Stylesheet injected into pages rendered right-to-left.
stylesheet_href = \"assets/css/rtl.css\"

[preference]
# File persisting the last chosen language, relative to the site root.
file = \".sitelang-pref\"
"
    .to_string()
}
