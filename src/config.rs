//! Declared configuration
//!
//! A config file holds an optional `[provider]` block and one
//! `[email_template.<address>]` table per managed template. TOML is the
//! default; a `.json` extension switches to JSON with the same shape.

use crate::resource::email_template::EmailTemplateConfig;
use anyhow::{Context, Result};
use declarative::{Diagnostic, Diagnostics};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file used when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "pocinfobipemails.toml";

/// State file name, placed next to the config file
pub const DEFAULT_STATE_FILE: &str = "pocinfobipemails.state.toml";

/// Supported config formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension, TOML unless it says `.json`
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// The `[provider]` block
///
/// Unset values fall back to the environment when the provider is
/// configured; see [`crate::provider::ProviderConfig::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderBlock {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

/// A whole config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderBlock,

    /// Declared templates keyed by local address
    #[serde(default)]
    pub email_template: BTreeMap<String, EmailTemplateConfig>,
}

impl Config {
    /// Load a config file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::parse(&content, ConfigFormat::from_path(path))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!(
            "Loaded {} template(s) from {}",
            config.email_template.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    /// Check what parsing alone can't
    pub fn validate(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        for address in self.email_template.keys() {
            if !is_valid_address(address) {
                diagnostics.push(Diagnostic::error(
                    "Invalid resource address",
                    format!(
                        "\"{address}\" is not a valid address. Addresses may only contain \
                         letters, digits, underscores and dashes, and must start with a letter \
                         or underscore."
                    ),
                ));
            }
        }
        diagnostics
    }
}

/// Addresses follow identifier rules so `type.address` targets stay unambiguous
pub fn is_valid_address(address: &str) -> bool {
    let mut chars = address.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}

/// State file that belongs to `config_path`
pub fn default_state_path(config_path: &Path) -> PathBuf {
    config_path.with_file_name(DEFAULT_STATE_FILE)
}
