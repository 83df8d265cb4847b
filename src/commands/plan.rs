//! `plan`, `apply` and `destroy`

use crate::Context;
use crate::cli::{ApplyArgs, DestroyArgs, PlanArgs};
use crate::commands::{Project, check};
use crate::differ;
use crate::resource::{EmailTemplateModel, EmailTemplateResource};
use crate::ui;
use anyhow::Result;
use colored::Colorize;
use declarative::{
    Action, ApplyResult, ConfirmCallback, ExecuteOptions, ExecuteReport, ExecutionPlan,
    ProgressCallback, Resource,
};

/// Prints one line per applied change
struct TerminalProgress {
    quiet: bool,
}

impl ProgressCallback for TerminalProgress {
    fn on_plan_start(&mut self, count: usize) {
        if !self.quiet {
            println!();
            println!("Applying {count} change(s)...");
        }
    }

    fn on_resource_start(&mut self, address: &str, action: Action) {
        log::info!("{action} {address}");
    }

    fn on_resource_complete(&mut self, address: &str, result: &ApplyResult) {
        match result {
            ApplyResult::Failed { error } => {
                println!("  {} {}: {}", "✗".red(), address, error.red());
            }
            _ if self.quiet => {}
            ApplyResult::Created => println!("  {} {} created", "+".green(), address),
            ApplyResult::Updated => println!("  {} {} updated", "~".yellow(), address),
            ApplyResult::Deleted => println!("  {} {} destroyed", "-".red(), address),
            ApplyResult::NoChange | ApplyResult::Skipped { .. } => {}
        }
    }

    fn on_plan_complete(&mut self) {}
}

/// Asks before applying, unless `--yes` was given
struct PromptConfirm {
    yes: bool,
}

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        if self.yes {
            return Ok(true);
        }
        confirm_proceed(prompt)
    }
}

fn confirm_proceed(prompt: &str) -> Result<bool> {
    use dialoguer::Confirm;

    println!();
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;

    Ok(confirmed)
}

/// Re-read managed templates in place; read failures abort the command
fn refresh_state(resource: &EmailTemplateResource, project: &mut Project) -> Result<()> {
    if project.state.is_empty() {
        return Ok(());
    }
    log::info!("Refreshing {} template(s)", project.state.email_template.len());
    let diagnostics = declarative::refresh(resource, &mut project.state.email_template);
    check(&diagnostics)
}

fn build_plan(
    resource: &EmailTemplateResource,
    project: &Project,
    target: Option<&str>,
) -> ExecutionPlan<EmailTemplateModel> {
    ExecutionPlan::build(
        resource,
        &project.config.email_template,
        &project.state.email_template,
    )
    .filter_by_target(target)
}

pub fn plan(ctx: &Context, args: &PlanArgs) -> Result<()> {
    let mut project = Project::load(ctx)?;
    let resource = project.connect()?;
    if args.refresh.enabled() {
        refresh_state(&resource, &mut project)?;
    }

    let plan = build_plan(&resource, &project, args.target.as_deref());
    differ::display_plan(plan.diffs(), &resource.schema());
    Ok(())
}

pub fn apply(ctx: &Context, args: &ApplyArgs) -> Result<()> {
    let mut project = Project::load(ctx)?;
    let resource = project.connect()?;
    if args.refresh.enabled() {
        refresh_state(&resource, &mut project)?;
    }

    let plan = build_plan(&resource, &project, args.target.as_deref());
    differ::display_plan(plan.diffs(), &resource.schema());
    if !plan.has_changes() {
        // A refresh may still have picked up remote drift.
        if args.refresh.enabled() && !args.dry_run {
            project.save_state()?;
        }
        return Ok(());
    }

    let opts = ExecuteOptions {
        dry_run: args.dry_run,
        verbose: ctx.verbose > 0,
    };
    run(ctx, &resource, plan, &mut project, &opts, args.yes, "Apply")
}

pub fn destroy(ctx: &Context, args: &DestroyArgs) -> Result<()> {
    let mut project = Project::load(ctx)?;
    if project.state.is_empty() {
        ui::info("Nothing to destroy, no templates are managed.");
        return Ok(());
    }
    let resource = project.connect()?;

    let plan = ExecutionPlan::destroy(&resource, &project.state.email_template)
        .filter_by_target(args.target.as_deref());
    differ::display_plan(plan.diffs(), &resource.schema());
    if !plan.has_changes() {
        return Ok(());
    }

    let opts = ExecuteOptions {
        dry_run: false,
        verbose: ctx.verbose > 0,
    };
    run(ctx, &resource, plan, &mut project, &opts, args.yes, "Destroy")
}

fn run(
    ctx: &Context,
    resource: &EmailTemplateResource,
    plan: ExecutionPlan<EmailTemplateModel>,
    project: &mut Project,
    opts: &ExecuteOptions,
    yes: bool,
    verb: &str,
) -> Result<()> {
    let report = declarative::execute(
        resource,
        plan,
        &mut project.state.email_template,
        opts,
        &mut TerminalProgress { quiet: ctx.quiet },
        &mut PromptConfirm { yes },
    )?;

    if report.summary.skipped > 0 && report.summary.total_changes() + report.summary.failed == 0
    {
        if opts.dry_run {
            ui::info("Dry run, no changes were made.");
        } else {
            ui::warn(&format!("{verb} cancelled."));
        }
        return Ok(());
    }

    // Partially failed runs are saved too: completed changes must not be forgotten.
    project.save_state()?;
    print_summary(verb, &report);
    check(&report.diagnostics)
}

fn print_summary(verb: &str, report: &ExecuteReport) {
    let summary = &report.summary;
    println!();
    let line = format!(
        "{verb} complete! Templates: {} added, {} changed, {} destroyed.",
        summary.created, summary.updated, summary.deleted
    );
    if summary.is_success() {
        ui::success(&line);
    } else {
        ui::warn(&line);
        ui::error(&format!("{} change(s) failed", summary.failed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderClient;
    use crate::resource::EmailTemplateConfig;
    use declarative::{AutoConfirm, NoProgress};
    use infobip::{ApiKey, MockEmailApi, MockOp};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn resource(mock: &MockEmailApi) -> EmailTemplateResource {
        let client = ProviderClient::configure(Arc::new(mock.clone()), ApiKey::new("key")).unwrap();
        EmailTemplateResource::new(client)
    }

    fn welcome(html: &str) -> BTreeMap<String, EmailTemplateConfig> {
        BTreeMap::from([(
            "welcome".to_string(),
            EmailTemplateConfig {
                name: "Welcome".to_string(),
                from: "noreply@acme.test".to_string(),
                subject: "Hello".to_string(),
                html: html.to_string(),
                ..Default::default()
            },
        )])
    }

    fn apply(
        resource: &EmailTemplateResource,
        desired: &BTreeMap<String, EmailTemplateConfig>,
        state: &mut BTreeMap<String, EmailTemplateModel>,
    ) -> ExecuteReport {
        let plan = ExecutionPlan::build(resource, desired, state);
        declarative::execute(
            resource,
            plan,
            state,
            &ExecuteOptions::default(),
            &mut NoProgress,
            &mut AutoConfirm,
        )
        .unwrap()
    }

    #[test]
    fn test_reindented_html_needs_no_update() {
        let mock = MockEmailApi::new();
        let resource = resource(&mock);
        let mut state = BTreeMap::new();

        let report = apply(
            &resource,
            &welcome("<html><body><h2>Welcome</h2></body></html>"),
            &mut state,
        );
        assert_eq!(report.summary.created, 1);

        let reindented = welcome("<html>\n  <body>\n    <h2>Welcome</h2>\n  </body>\n</html>\n");
        let plan = ExecutionPlan::build(&resource, &reindented, &state);
        assert!(!plan.has_changes());

        let report = apply(&resource, &reindented, &mut state);
        assert_eq!(report.summary.no_change, 1);
        assert!(!mock.calls().contains(&MockOp::Update));
    }

    #[test]
    fn test_failed_create_is_not_recorded() {
        let mock = MockEmailApi::new();
        let resource = resource(&mock);
        mock.fail(MockOp::Create, 400, "BAD_REQUEST: Invalid sender");
        let mut state = BTreeMap::new();

        let report = apply(&resource, &welcome("<p>Hi</p>"), &mut state);
        assert_eq!(report.summary.failed, 1);
        assert!(state.is_empty());
        let error = report.diagnostics.first_error().unwrap();
        assert_eq!(error.address.as_deref(), Some("welcome"));
        assert_eq!(error.summary, "Error Creating Email Template");
    }

    #[test]
    fn test_removed_from_config_is_deleted() {
        let mock = MockEmailApi::new();
        let resource = resource(&mock);
        let mut state = BTreeMap::new();
        apply(&resource, &welcome("<p>Hi</p>"), &mut state);

        let report = apply(&resource, &BTreeMap::new(), &mut state);
        assert_eq!(report.summary.deleted, 1);
        assert!(state.is_empty());
        assert!(mock.template(1).is_none());
    }

    #[test]
    fn test_destroy_tolerates_missing_remote() {
        let mock = MockEmailApi::new();
        let resource = resource(&mock);
        let mut state = BTreeMap::new();
        apply(&resource, &welcome("<p>Hi</p>"), &mut state);
        mock.remove(1);

        let plan = ExecutionPlan::destroy(&resource, &state);
        let report = declarative::execute(
            &resource,
            plan,
            &mut state,
            &ExecuteOptions::default(),
            &mut NoProgress,
            &mut AutoConfirm,
        )
        .unwrap();
        assert_eq!(report.summary.deleted, 1);
        assert!(!report.diagnostics.has_error());
        assert!(state.is_empty());
    }

    #[test]
    fn test_target_limits_plan() {
        let mock = MockEmailApi::new();
        let resource = resource(&mock);
        let mut desired = welcome("<p>Hi</p>");
        desired.insert(
            "reset".to_string(),
            EmailTemplateConfig {
                name: "Reset".to_string(),
                ..desired["welcome"].clone()
            },
        );

        let plan = ExecutionPlan::build(&resource, &desired, &BTreeMap::new())
            .filter_by_target(Some("email_template.reset"));
        let addresses: Vec<_> = plan.diffs().map(|d| d.address.as_str()).collect();
        assert_eq!(addresses, vec!["reset"]);
    }
}
