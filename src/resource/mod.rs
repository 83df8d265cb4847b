//! Resources and data sources of the provider
//!
//! - [`email_template`]: managed templates (create/read/update/delete/import)
//! - [`email_templates`]: read-only listing of every template on the account

pub mod email_template;
pub mod email_templates;

pub use email_template::{EmailTemplateConfig, EmailTemplateModel, EmailTemplateResource};
