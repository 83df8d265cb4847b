//! `validate` - check the config without contacting the API

use crate::Context;
use crate::commands::check;
use crate::config::Config;
use crate::provider::ProviderConfig;
use crate::ui;
use anyhow::Result;

pub fn run(ctx: &Context) -> Result<()> {
    let config = Config::load(&ctx.config_path)?;

    let mut diagnostics = config.validate();
    if let Err(provider) = ProviderConfig::from_env(&config.provider) {
        diagnostics.append(provider);
    }
    check(&diagnostics)?;

    ui::success(&format!(
        "{} is valid ({} template(s))",
        ctx.config_path.display(),
        config.email_template.len()
    ));
    Ok(())
}
