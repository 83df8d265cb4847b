//! Command implementations
//!
//! Every command that changes state follows the same shape: load config and
//! state, configure the provider, run one engine operation, save state,
//! then render diagnostics. Commands return an error whenever an error
//! diagnostic was produced so the process exits non-zero.

pub mod plan;
pub mod schema;
pub mod state;
pub mod templates;
pub mod validate;

use crate::Context;
use crate::config::Config;
use crate::provider::{ProviderClient, ProviderConfig};
use crate::resource::EmailTemplateResource;
use crate::state::State;
use crate::ui;
use anyhow::{Result, bail};
use declarative::Diagnostics;
use std::path::PathBuf;

/// Config and state loaded for one command
pub struct Project {
    pub config: Config,
    pub state: State,
    state_path: PathBuf,
}

impl Project {
    /// Load and validate the config, then load state
    pub fn load(ctx: &Context) -> Result<Self> {
        let config = Config::load(&ctx.config_path)?;
        check(&config.validate())?;
        let state = State::load(&ctx.state_path)?;
        Ok(Self {
            config,
            state,
            state_path: ctx.state_path.clone(),
        })
    }

    pub fn save_state(&mut self) -> Result<()> {
        self.state.save(&self.state_path)
    }

    /// Configure the provider and build the resource handler
    pub fn connect(&self) -> Result<EmailTemplateResource> {
        Ok(EmailTemplateResource::new(connect(&self.config)?))
    }
}

/// Resolve provider settings and verify them against the API
pub fn connect(config: &Config) -> Result<ProviderClient> {
    let client = ProviderConfig::from_env(&config.provider)
        .and_then(|resolved| ProviderClient::connect(&resolved));
    match client {
        Ok(client) => Ok(client),
        Err(diagnostics) => {
            ui::diagnostics(&diagnostics);
            bail!("Provider configuration failed")
        }
    }
}

/// Render diagnostics and fail if any of them is an error
pub fn check(diagnostics: &Diagnostics) -> Result<()> {
    ui::diagnostics(diagnostics);
    match diagnostics.error_count() {
        0 => Ok(()),
        1 => bail!("1 error"),
        n => bail!("{n} errors"),
    }
}
