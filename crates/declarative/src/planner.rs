//! Execution planner - compares declared config against recorded state

use crate::diff::{Action, DiffSummary, ResourceDiff};
use crate::resource::Resource;
use std::collections::{BTreeMap, BTreeSet};

/// Planned change for one instance, with the models the executor needs
#[derive(Debug, Clone)]
pub struct PlannedChange<M> {
    pub diff: ResourceDiff,
    /// State recorded before the change
    pub prior: Option<M>,
    /// State the change is expected to produce
    pub planned: Option<M>,
}

/// Every planned change, ordered by address
#[derive(Debug, Clone)]
pub struct ExecutionPlan<M> {
    pub changes: Vec<PlannedChange<M>>,
}

impl<M: Clone> ExecutionPlan<M> {
    /// Plan the changes that make `state` match `desired`
    ///
    /// Addresses only in `desired` are created, addresses only in `state`
    /// are deleted, and addresses in both are updated when the resource
    /// reports attribute changes.
    pub fn build<R>(
        resource: &R,
        desired: &BTreeMap<String, R::Config>,
        state: &BTreeMap<String, M>,
    ) -> Self
    where
        R: Resource<Model = M>,
    {
        let addresses: BTreeSet<&String> = desired.keys().chain(state.keys()).collect();

        let changes = addresses
            .into_iter()
            .map(|address| {
                let prior = state.get(address);
                let planned = desired.get(address).map(|config| resource.plan(config, prior));
                let changes = resource.changes(prior, planned.as_ref());

                let action = match (prior, &planned) {
                    (None, Some(_)) => Action::Create,
                    (Some(_), None) => Action::Delete,
                    (Some(_), Some(_)) if changes.is_empty() => Action::NoOp,
                    (Some(_), Some(_)) => Action::Update,
                    (None, None) => unreachable!("address comes from desired or state"),
                };
                log::debug!("{address}: {action}");

                PlannedChange {
                    diff: ResourceDiff {
                        address: address.clone(),
                        resource_type: resource.type_name().to_string(),
                        id: prior.and_then(|p| resource.instance_id(p)),
                        action,
                        changes,
                    },
                    prior: prior.cloned(),
                    planned,
                }
            })
            .collect();

        Self { changes }
    }

    /// Plan the deletion of everything in `state`
    pub fn destroy<R>(resource: &R, state: &BTreeMap<String, M>) -> Self
    where
        R: Resource<Model = M>,
    {
        let changes = state
            .iter()
            .map(|(address, prior)| PlannedChange {
                diff: ResourceDiff {
                    address: address.clone(),
                    resource_type: resource.type_name().to_string(),
                    id: resource.instance_id(prior),
                    action: Action::Delete,
                    changes: resource.changes(Some(prior), None),
                },
                prior: Some(prior.clone()),
                planned: None,
            })
            .collect();

        Self { changes }
    }
}

impl<M> ExecutionPlan<M> {
    /// Filter plan to only include instances matching a target
    ///
    /// Target format: "address" or "type.address". The type may be given
    /// without its provider prefix ("email_template.welcome").
    pub fn filter_by_target(self, target: Option<&str>) -> Self {
        match target {
            None => self,
            Some(t) => {
                let (resource_type, address) = parse_target(t);
                Self {
                    changes: self
                        .changes
                        .into_iter()
                        .filter(|c| matches_target(&c.diff, resource_type, address))
                        .collect(),
                }
            }
        }
    }

    pub fn diffs(&self) -> impl Iterator<Item = &ResourceDiff> {
        self.changes.iter().map(|c| &c.diff)
    }

    pub fn summary(&self) -> DiffSummary {
        DiffSummary::from_diffs(self.diffs())
    }

    /// Check if applying the plan would change anything
    pub fn has_changes(&self) -> bool {
        self.summary().has_changes()
    }

    /// Total number of instances in the plan, including no-ops
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Parse a target string like "type.address" into (type, address)
fn parse_target(target: &str) -> (Option<&str>, &str) {
    match target.rsplit_once('.') {
        Some((resource_type, address)) => (Some(resource_type), address),
        None => (None, target),
    }
}

/// Check if an instance matches the target
fn matches_target(diff: &ResourceDiff, resource_type: Option<&str>, address: &str) -> bool {
    if let Some(rt) = resource_type {
        let matches_type =
            diff.resource_type == rt || diff.resource_type.ends_with(&format!("_{rt}"));
        if !matches_type {
            return false;
        }
    }

    diff.address == address
}
