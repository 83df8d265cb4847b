//! # infobip
//!
//! Blocking client for the Infobip email template API.
//!
//! This crate provides:
//! - Typed requests and responses for the template endpoints
//! - An [`EmailApi`] trait with an HTTP implementation and an in-memory mock
//! - API key handling that never prints the key
//!
//! ## Example
//!
//! ```no_run
//! use infobip::backend::http::HttpEmailApi;
//! use infobip::{ApiKey, Auth, EmailApi, TemplateRequest};
//!
//! let api = HttpEmailApi::new("xyz.api.infobip.com").unwrap();
//! let key = ApiKey::new("secret");
//!
//! let created = api
//!     .create_template(&Auth::new(&key), &TemplateRequest {
//!         name: "Welcome".to_string(),
//!         from: "Acme <noreply@acme.test>".to_string(),
//!         subject: "Welcome aboard".to_string(),
//!         html: "<html><body>Hi</body></html>".to_string(),
//!         ..Default::default()
//!     })
//!     .expect("create failed");
//!
//! println!("Created template {}", created.id);
//! ```
//!
//! ## Endpoints
//!
//! | Operation | Request                            |
//! |-----------|------------------------------------|
//! | list      | `GET /email/2/templates`           |
//! | create    | `POST /email/2/templates`          |
//! | get       | `GET /email/2/templates/{id}`      |
//! | update    | `PUT /email/2/templates/{id}`      |
//! | delete    | `DELETE /email/2/templates/{id}`   |

pub mod auth;
pub mod backend;
pub mod error;
pub mod types;

pub use auth::{API_KEY_PREFIX, ApiKey, Auth};
pub use backend::{EmailApi, MockEmailApi, MockOp};
pub use error::{Error, ErrorCategory, Result};
pub use types::{EmailTemplate, TemplateRequest};

/// Parse a template id as kept in local state.
///
/// Ids are integers on the wire but handled as opaque strings everywhere
/// else, so this is the only place that cares about their shape.
pub fn parse_template_id(id: &str) -> Result<i64> {
    id.trim()
        .parse()
        .map_err(|_| Error::InvalidId(id.to_string()))
}
