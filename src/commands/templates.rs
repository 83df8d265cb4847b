//! `templates` - list every template on the account

use crate::Context;
use crate::commands::{check, connect};
use crate::config::Config;
use crate::resource::email_templates;
use crate::state::State;
use crate::ui;
use anyhow::Result;
use colored::Colorize;
use std::collections::BTreeMap;

pub fn run(ctx: &Context) -> Result<()> {
    let config = Config::load(&ctx.config_path)?;
    let state = State::load(&ctx.state_path)?;
    let client = connect(&config)?;

    let templates = match email_templates::read(&client) {
        Ok(templates) => templates,
        Err(diagnostics) => return check(&diagnostics),
    };
    if templates.is_empty() {
        ui::info("No templates on this account.");
        return Ok(());
    }

    let managed: BTreeMap<&str, &str> = state
        .email_template
        .iter()
        .map(|(address, model)| (model.id.as_str(), address.as_str()))
        .collect();

    ui::header(&format!("Email templates ({})", templates.len()));
    for template in &templates {
        let address = managed
            .get(template.id.as_str())
            .map(|a| format!("[{a}]").cyan().to_string())
            .unwrap_or_default();
        println!(
            "  {:>10}  {:<32} {} {}",
            template.id.dimmed(),
            template.name,
            template.subject.dimmed(),
            address
        );
    }
    Ok(())
}
