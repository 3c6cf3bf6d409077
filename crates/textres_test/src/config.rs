//! Test resolver configuration (textres-test.toml)

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use textres_core::parse_locale;
use unic_langid::LanguageIdentifier;

/// Settings for a [`TestResolver`](crate::TestResolver).
///
/// ```toml
/// default_locale = "fr-FR"
/// log_filter = "textres_core=debug"
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TestResolverConfig {
    /// Locale used by `TestResolver::resolve`
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// `tracing` env-filter directives for [`init_test_logging_with`](crate::init_test_logging_with)
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_locale() -> String {
    "en-US".to_string()
}

impl Default for TestResolverConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            log_filter: None,
        }
    }
}

impl TestResolverConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse test resolver config")
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// The parsed `default_locale`.
    pub fn locale(&self) -> Result<LanguageIdentifier> {
        parse_locale(&self.default_locale)
            .with_context(|| format!("Invalid default_locale `{}`", self.default_locale))
    }
}
