//! Resource trait for lifecycle-managed objects
//!
//! A Resource is a type of remote object that can be created, read,
//! updated, deleted and imported. One implementation handles every
//! instance of its type; instances are plain `Model` values kept in state.

use crate::diagnostics::Diagnostics;
use crate::diff::AttributeChange;
use crate::schema::Schema;
use std::fmt;

/// Outcome of a lifecycle operation
///
/// `state` is what should be recorded for the instance afterwards: `None`
/// removes it. Operations that fail keep whatever was recorded before (or
/// nothing, for a failed create) and explain why in `diagnostics`.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<M> {
    pub state: Option<M>,
    pub diagnostics: Diagnostics,
}

impl<M> Response<M> {
    /// Successful operation leaving `state` behind
    pub fn ok(state: M) -> Self {
        Self {
            state: Some(state),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Successful operation after which the instance no longer exists
    pub fn removed() -> Self {
        Self {
            state: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Failed operation; `state` is the value to keep recording
    pub fn failed(state: Option<M>, diagnostics: impl Into<Diagnostics>) -> Self {
        Self {
            state,
            diagnostics: diagnostics.into(),
        }
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}

/// Core trait for lifecycle-managed resources
///
/// # Example
///
/// ```ignore
/// use declarative::{Resource, Response, Schema, Attribute, AttributeChange};
///
/// #[derive(Debug, Clone)]
/// struct Note { id: String, text: String }
///
/// struct NoteResource { /* client handle */ }
///
/// impl Resource for NoteResource {
///     type Config = String;
///     type Model = Note;
///
///     fn type_name(&self) -> &'static str { "note" }
///
///     fn schema(&self) -> Schema {
///         Schema::new("A note")
///             .with_attribute("id", Attribute::computed_string())
///             .with_attribute("text", Attribute::required_string())
///     }
///
///     fn plan(&self, text: &String, prior: Option<&Note>) -> Note {
///         Note {
///             id: prior.map(|p| p.id.clone()).unwrap_or_default(),
///             text: text.clone(),
///         }
///     }
///
///     // changes(), create(), read(), update(), delete(), import_state() ...
/// }
/// ```
pub trait Resource {
    /// Attributes as written by the user
    type Config;

    /// Everything recorded about one instance
    type Model: Clone + fmt::Debug;

    /// Resource type name (e.g. "acme_email_template")
    fn type_name(&self) -> &'static str;

    /// Attribute schema for this resource type
    fn schema(&self) -> Schema;

    /// Remote identifier of an instance, if it has one yet
    fn instance_id(&self, model: &Self::Model) -> Option<String>;

    /// Compute the planned model for `config`
    ///
    /// Read-only attributes are carried over from `prior`. Plan modifiers
    /// run here, so a value they suppress never shows up as a change.
    fn plan(&self, config: &Self::Config, prior: Option<&Self::Model>) -> Self::Model;

    /// User-settable attributes that differ between `before` and `after`
    ///
    /// `before` is `None` for a new instance, `after` is `None` for one
    /// being removed.
    fn changes(
        &self,
        before: Option<&Self::Model>,
        after: Option<&Self::Model>,
    ) -> Vec<AttributeChange>;

    /// Create the remote object described by `plan`
    fn create(&self, plan: Self::Model) -> Response<Self::Model>;

    /// Refresh `state` from the remote object
    fn read(&self, state: Self::Model) -> Response<Self::Model>;

    /// Replace every mutable field of the remote object with `plan`
    fn update(&self, plan: Self::Model, prior: Self::Model) -> Response<Self::Model>;

    /// Delete the remote object behind `state`
    fn delete(&self, state: Self::Model) -> Response<Self::Model>;

    /// Seed state for an existing remote object from its identifier
    fn import_state(&self, id: &str) -> Response<Self::Model>;
}
