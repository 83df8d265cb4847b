//! `refresh`, `import` and `state list/show/rm`

use crate::Context;
use crate::commands::{Project, check};
use crate::config::is_valid_address;
use crate::resource::EmailTemplateModel;
use crate::state::State;
use crate::ui;
use anyhow::{Result, bail};
use colored::Colorize;

pub fn refresh(ctx: &Context) -> Result<()> {
    let mut project = Project::load(ctx)?;
    if project.state.is_empty() {
        ui::info("No templates are managed yet.");
        return Ok(());
    }
    let resource = project.connect()?;

    let diagnostics = declarative::refresh(&resource, &mut project.state.email_template);
    // Entries that failed to read are kept as they were.
    project.save_state()?;
    check(&diagnostics)?;

    ui::success(&format!(
        "Refreshed {} template(s)",
        project.state.email_template.len()
    ));
    Ok(())
}

pub fn import(ctx: &Context, address: &str, id: &str) -> Result<()> {
    if !is_valid_address(address) {
        bail!("Invalid address {address:?}");
    }

    let mut project = Project::load(ctx)?;
    if !project.config.email_template.contains_key(address) {
        ui::warn(&format!(
            "{address} is not declared in {}; the next apply will destroy it.",
            ctx.config_path.display()
        ));
    }
    let resource = project.connect()?;

    let diagnostics = declarative::import(
        &resource,
        address,
        id,
        &mut project.state.email_template,
    );
    if diagnostics.has_error() {
        return check(&diagnostics);
    }

    project.save_state()?;
    check(&diagnostics)?;
    ui::success(&format!("Imported template {id} as {address}"));
    Ok(())
}

pub fn list(ctx: &Context) -> Result<()> {
    let state = State::load(&ctx.state_path)?;
    if state.is_empty() {
        ui::info("No templates are managed yet.");
        return Ok(());
    }

    for (address, model) in &state.email_template {
        println!(
            "{:<24} {:>10}  {}",
            address.bold(),
            model.id.dimmed(),
            model.name
        );
    }
    Ok(())
}

pub fn show(ctx: &Context, address: &str) -> Result<()> {
    let state = State::load(&ctx.state_path)?;
    let Some(model) = state.get(address) else {
        bail!("{address} is not in state");
    };

    ui::header(address);
    for (key, value) in fields(model) {
        ui::kv(key, &value);
    }
    println!();
    println!("  {}", "html:".dimmed());
    for line in model.html.lines() {
        ui::dim(&format!("  {line}"));
    }
    Ok(())
}

fn fields(model: &EmailTemplateModel) -> Vec<(&'static str, String)> {
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    vec![
        ("id", model.id.clone()),
        ("name", model.name.clone()),
        ("from", model.from.clone()),
        ("reply_to", optional(&model.reply_to)),
        ("subject", model.subject.clone()),
        ("preheader", optional(&model.preheader)),
        ("landing_page", optional(&model.landing_page)),
        ("is_html_editable", model.is_html_editable.to_string()),
        ("image_preview_url", optional(&model.image_preview_url)),
        ("created_at", optional(&model.created_at)),
        ("updated_at", optional(&model.updated_at)),
    ]
}

pub fn rm(ctx: &Context, address: &str) -> Result<()> {
    let mut state = State::load(&ctx.state_path)?;
    let Some(removed) = state.remove(address) else {
        bail!("{address} is not in state");
    };
    state.save(&ctx.state_path)?;

    ui::success(&format!(
        "Removed {address} from state; template {} was left on the server",
        removed.id
    ));
    Ok(())
}
