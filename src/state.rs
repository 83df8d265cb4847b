use crate::resource::EmailTemplateModel;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Current state file format
pub const STATE_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("state file format {found} is newer than the supported format {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

// ============================================================================
// State Structures
// ============================================================================

/// Everything recorded about managed templates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct State {
    /// Format version of the file
    pub version: u32,

    /// Last time the state was written
    pub last_updated: DateTime<Utc>,

    /// Managed templates keyed by local address
    #[serde(default)]
    pub email_template: BTreeMap<String, EmailTemplateModel>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            last_updated: Utc::now(),
            email_template: BTreeMap::new(),
        }
    }
}

// ============================================================================
// State Implementation
// ============================================================================

impl State {
    /// Load state from disk, or return empty state if the file doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("State file {} does not exist, using empty state", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        let state: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

        if state.version > STATE_VERSION {
            return Err(StateError::UnsupportedVersion {
                found: state.version,
                supported: STATE_VERSION,
            })
            .with_context(|| format!("Cannot use state file: {}", path.display()));
        }

        log::debug!(
            "Loaded state with {} template(s) from {}",
            state.email_template.len(),
            path.display()
        );
        Ok(state)
    }

    /// Save state to disk, stamping `last_updated`
    pub fn save(&mut self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
        }

        self.version = STATE_VERSION;
        self.last_updated = Utc::now();
        let content = toml::to_string_pretty(&self).context("Failed to serialize state to TOML")?;

        fs::write(path, &content)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;

        log::debug!("Saved state to {}", path.display());
        Ok(())
    }

    /// Addresses of every managed template, in order
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.email_template.keys().map(String::as_str)
    }

    pub fn get(&self, address: &str) -> Option<&EmailTemplateModel> {
        self.email_template.get(address)
    }

    /// Stop managing a template without touching the remote side
    pub fn remove(&mut self, address: &str) -> Option<EmailTemplateModel> {
        self.email_template.remove(address)
    }

    pub fn is_empty(&self) -> bool {
        self.email_template.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
