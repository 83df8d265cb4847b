//! # Declarative
//!
//! A framework for managing remote objects from declared configuration.
//!
//! This crate provides the plan/apply machinery: compare what the
//! configuration declares against what was recorded last time, show the
//! difference, and drive each instance through its lifecycle.
//!
//! ## Core Concepts
//!
//! - **Resource**: A kind of remote object with create/read/update/delete/import
//! - **Schema**: The attributes of a resource and how they behave
//! - **Diagnostics**: Errors and warnings returned instead of raised
//! - **ExecutionPlan**: The changes that make recorded state match the config
//! - **Executor**: Applies a plan one instance at a time
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{execute, AutoConfirm, ExecuteOptions, ExecutionPlan, NoProgress};
//!
//! let plan = ExecutionPlan::build(&resource, &desired, &state);
//! let report = execute(
//!     &resource,
//!     plan,
//!     &mut state,
//!     &ExecuteOptions::default(),
//!     &mut NoProgress,
//!     &mut AutoConfirm,
//! )?;
//! println!("{} changed", report.summary.total_changes());
//! ```
//!
//! ## Callback Traits
//!
//! - [`ProgressCallback`]: Receives progress updates
//! - [`ConfirmCallback`]: Handles user confirmations
//!
//! This allows the crate to be used without a hard dependency on any
//! terminal UI.

pub mod context;
pub mod diagnostics;
pub mod diff;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod schema;
pub mod types;

#[cfg(test)]
mod testing;

pub use context::{AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use diff::{Action, AttributeChange, DiffSummary, ResourceDiff};
pub use executor::{execute, import, refresh};
pub use planner::{ExecutionPlan, PlannedChange};
pub use resource::{Resource, Response};
pub use schema::{Attribute, AttributeType, Schema, StringPlanModifier, StringRequest};
pub use types::{ApplyResult, ExecuteOptions, ExecuteReport, ExecuteSummary};
