//! Execution engine - applies planned changes one instance at a time

use crate::context::{ConfirmCallback, ProgressCallback};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::diff::Action;
use crate::planner::{ExecutionPlan, PlannedChange};
use crate::resource::{Resource, Response};
use crate::types::{ApplyResult, ExecuteOptions, ExecuteReport};
use anyhow::Result;
use std::collections::BTreeMap;

/// Execute a plan against `state`
///
/// Changes are applied sequentially in plan order, one lifecycle call per
/// instance. After each call `state` holds exactly what the operation
/// reported, so a failure part-way through still leaves every earlier
/// change recorded. Nothing is retried.
///
/// # Arguments
/// * `resource` - The resource implementation
/// * `plan` - The execution plan to run
/// * `state` - Recorded state, updated in place
/// * `opts` - Execution options (dry_run, verbose)
/// * `progress` - Progress callback
/// * `confirm` - Confirmation callback
pub fn execute<R, P, C>(
    resource: &R,
    plan: ExecutionPlan<R::Model>,
    state: &mut BTreeMap<String, R::Model>,
    opts: &ExecuteOptions,
    progress: &mut P,
    confirm: &mut C,
) -> Result<ExecuteReport>
where
    R: Resource,
    P: ProgressCallback,
    C: ConfirmCallback,
{
    let mut report = ExecuteReport::default();

    let (pending, unchanged): (Vec<_>, Vec<_>) = plan
        .changes
        .into_iter()
        .partition(|c| c.diff.action.is_change());
    report.summary.no_change = unchanged.len();

    if pending.is_empty() {
        return Ok(report);
    }

    let skip_reason = if opts.dry_run {
        Some("Dry run")
    } else if !confirm.confirm("Apply these changes?")? {
        Some("Declined")
    } else {
        None
    };
    if let Some(reason) = skip_reason {
        for change in &pending {
            log::debug!("Skipping {}: {reason}", change.diff.address);
            report.summary.add_result(&ApplyResult::Skipped {
                reason: reason.to_string(),
            });
        }
        return Ok(report);
    }

    progress.on_plan_start(pending.len());
    for change in pending {
        let address = change.diff.address.clone();
        progress.on_resource_start(&address, change.diff.action);

        let (result, diagnostics) = apply_change(resource, change, state);
        if opts.verbose {
            log::info!("{address}: {result:?}");
        }

        report.summary.add_result(&result);
        report.diagnostics.append(diagnostics.with_address(&address));
        progress.on_resource_complete(&address, &result);
    }
    progress.on_plan_complete();

    Ok(report)
}

/// Apply a single planned change and record its outcome in `state`
fn apply_change<R: Resource>(
    resource: &R,
    change: PlannedChange<R::Model>,
    state: &mut BTreeMap<String, R::Model>,
) -> (ApplyResult, Diagnostics) {
    let address = change.diff.address;
    let action = change.diff.action;

    let response = match (action, change.prior, change.planned) {
        (Action::Create, _, Some(planned)) => resource.create(planned),
        (Action::Update, Some(prior), Some(planned)) => resource.update(planned, prior),
        (Action::Delete, Some(prior), _) => resource.delete(prior),
        (action, _, _) => {
            let diagnostic = Diagnostic::error(
                "Inconsistent plan",
                format!("Cannot {action} {address} with the models recorded in the plan."),
            );
            return (
                ApplyResult::Failed {
                    error: diagnostic.summary.clone(),
                },
                diagnostic.into(),
            );
        }
    };

    let result = result_for(action, &response);
    log::debug!("{address}: {action} -> {result:?}");
    record(state, &address, response.state);
    (result, response.diagnostics)
}

fn result_for<M>(action: Action, response: &Response<M>) -> ApplyResult {
    if let Some(error) = response.diagnostics.first_error() {
        return ApplyResult::Failed {
            error: error.summary.clone(),
        };
    }
    match action {
        Action::Create => ApplyResult::Created,
        Action::Update => ApplyResult::Updated,
        Action::Delete => ApplyResult::Deleted,
        Action::NoOp => ApplyResult::NoChange,
    }
}

fn record<M>(state: &mut BTreeMap<String, M>, address: &str, model: Option<M>) {
    match model {
        Some(model) => {
            state.insert(address.to_string(), model);
        }
        None => {
            state.remove(address);
        }
    }
}

/// Refresh every recorded instance from the remote side
///
/// A failed read leaves the instance as it was and reports why; it is never
/// taken as proof that the remote object is gone.
pub fn refresh<R: Resource>(resource: &R, state: &mut BTreeMap<String, R::Model>) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    let addresses: Vec<String> = state.keys().cloned().collect();

    for address in addresses {
        let Some(current) = state.get(&address).cloned() else {
            continue;
        };
        log::debug!("Refreshing {address}");
        let response = resource.read(current);
        record(state, &address, response.state);
        diagnostics.append(response.diagnostics.with_address(&address));
    }

    diagnostics
}

/// Start managing an existing remote object under `address`
///
/// The instance is seeded from `id` and then read; it is only recorded if
/// that read succeeds.
pub fn import<R: Resource>(
    resource: &R,
    address: &str,
    id: &str,
    state: &mut BTreeMap<String, R::Model>,
) -> Diagnostics {
    if state.contains_key(address) {
        return Diagnostic::error(
            "Resource already managed",
            format!(
                "{address} is already recorded in state. Remove it first to import a different object."
            ),
        )
        .into();
    }

    let seeded = resource.import_state(id);
    let mut diagnostics = seeded.diagnostics;
    let Some(seed) = seeded.state.filter(|_| !diagnostics.has_error()) else {
        return diagnostics.with_address(address);
    };

    let read = resource.read(seed);
    let failed = read.has_error();
    diagnostics.append(read.diagnostics);
    if !failed && let Some(model) = read.state {
        state.insert(address.to_string(), model);
    }

    diagnostics.with_address(address)
}
