//! Email template API abstraction.
//!
//! [`EmailApi`] is the seam between the lifecycle code and the network.
//! [`http::HttpEmailApi`] talks to the real service; [`MockEmailApi`] keeps
//! templates in memory for tests.
//!
//! # Testing
//!
//! ```
//! use infobip::backend::{EmailApi, MockEmailApi};
//! use infobip::{ApiKey, Auth, TemplateRequest};
//!
//! let mock = MockEmailApi::new();
//! let key = ApiKey::new("test-key");
//! let created = mock
//!     .create_template(&Auth::new(&key), &TemplateRequest {
//!         name: "Welcome".to_string(),
//!         html: "<p>Hi</p>".to_string(),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! let fetched = mock.get_template(&Auth::new(&key), created.id).unwrap();
//! assert_eq!(fetched.name, "Welcome");
//! ```

pub mod http;

use crate::auth::{ApiKey, Auth};
use crate::error::{Error, Result};
use crate::types::{EmailTemplate, TemplateRequest};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Operations on email templates.
pub trait EmailApi: Send + Sync {
    /// List every template on the account.
    fn list_templates(&self, auth: &Auth<'_>) -> Result<Vec<EmailTemplate>>;

    /// Create a template and return it as stored by the service.
    fn create_template(&self, auth: &Auth<'_>, request: &TemplateRequest)
    -> Result<EmailTemplate>;

    /// Fetch a template by id.
    ///
    /// # Errors
    ///
    /// Returns `Error::Api` with status 404 if the template doesn't exist.
    fn get_template(&self, auth: &Auth<'_>, id: i64) -> Result<EmailTemplate>;

    /// Replace every mutable field of a template.
    fn update_template(
        &self,
        auth: &Auth<'_>,
        id: i64,
        request: &TemplateRequest,
    ) -> Result<EmailTemplate>;

    /// Delete a template.
    ///
    /// # Errors
    ///
    /// Returns `Error::Api` with status 404 if the template doesn't exist.
    fn delete_template(&self, auth: &Auth<'_>, id: i64) -> Result<()>;
}

/// Kind of call made against [`MockEmailApi`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    List,
    Create,
    Get,
    Update,
    Delete,
}

#[derive(Debug, Default)]
struct MockState {
    templates: BTreeMap<i64, EmailTemplate>,
    next_id: i64,
    expected_key: Option<ApiKey>,
    failures: HashMap<MockOp, (u16, String)>,
    calls: Vec<MockOp>,
}

/// In-memory backend for tests.
///
/// Mirrors the service closely enough for lifecycle tests: ids are assigned
/// on create, create and update responses carry no timestamps, and missing
/// templates answer 404.
#[derive(Debug, Clone, Default)]
pub struct MockEmailApi {
    state: Arc<Mutex<MockState>>,
}

impl MockEmailApi {
    /// Create an empty mock that accepts any key.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every call whose key differs from `key` with a 401.
    #[must_use]
    pub fn with_api_key(self, key: ApiKey) -> Self {
        self.lock().expected_key = Some(key);
        self
    }

    /// Store a template as-is, e.g. one created outside of this tool.
    pub fn insert(&self, template: EmailTemplate) {
        let mut state = self.lock();
        state.next_id = state.next_id.max(template.id);
        state.templates.insert(template.id, template);
    }

    /// Remove a template behind the caller's back.
    pub fn remove(&self, id: i64) -> Option<EmailTemplate> {
        self.lock().templates.remove(&id)
    }

    pub fn template(&self, id: i64) -> Option<EmailTemplate> {
        self.lock().templates.get(&id).cloned()
    }

    /// Make every following call of `op` fail with the given status.
    pub fn fail(&self, op: MockOp, status: u16, message: impl Into<String>) {
        self.lock().failures.insert(op, (status, message.into()));
    }

    /// Undo [`MockEmailApi::fail`].
    pub fn clear_failure(&self, op: MockOp) {
        self.lock().failures.remove(&op);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<MockOp> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, op: MockOp, auth: &Auth<'_>) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        state.calls.push(op);
        if let Some(expected) = &state.expected_key
            && expected != auth.key()
        {
            return Err(Error::api(401, "UNAUTHORIZED: Invalid login details"));
        }
        if let Some((status, message)) = state.failures.get(&op) {
            return Err(Error::api(*status, message.clone()));
        }
        Ok(state)
    }
}

fn not_found(id: i64) -> Error {
    Error::api(404, format!("NOT_FOUND: template {id} does not exist"))
}

fn apply_request(template: &mut EmailTemplate, request: &TemplateRequest) {
    template.name = request.name.clone();
    template.from = request.from.clone();
    template.reply_to = request.reply_to.clone();
    template.subject = request.subject.clone();
    template.preheader = request.preheader.clone();
    template.html = request.html.clone();
    template.landing_page_id = request.landing_page.clone();
}

impl EmailApi for MockEmailApi {
    fn list_templates(&self, auth: &Auth<'_>) -> Result<Vec<EmailTemplate>> {
        let state = self.begin(MockOp::List, auth)?;
        Ok(state.templates.values().cloned().collect())
    }

    fn create_template(
        &self,
        auth: &Auth<'_>,
        request: &TemplateRequest,
    ) -> Result<EmailTemplate> {
        let mut state = self.begin(MockOp::Create, auth)?;
        state.next_id += 1;
        let id = state.next_id;

        let mut template = EmailTemplate {
            id,
            name: String::new(),
            from: String::new(),
            reply_to: None,
            subject: String::new(),
            preheader: None,
            html: String::new(),
            is_html_editable: true,
            landing_page_id: None,
            image_preview_url: Some(format!("https://preview.mock/{id}.png")),
            created_at: None,
            updated_at: None,
        };
        apply_request(&mut template, request);
        state.templates.insert(id, template.clone());
        Ok(template)
    }

    fn get_template(&self, auth: &Auth<'_>, id: i64) -> Result<EmailTemplate> {
        let state = self.begin(MockOp::Get, auth)?;
        state.templates.get(&id).cloned().ok_or_else(|| not_found(id))
    }

    fn update_template(
        &self,
        auth: &Auth<'_>,
        id: i64,
        request: &TemplateRequest,
    ) -> Result<EmailTemplate> {
        let mut state = self.begin(MockOp::Update, auth)?;
        let template = state.templates.get_mut(&id).ok_or_else(|| not_found(id))?;
        apply_request(template, request);

        let mut response = template.clone();
        response.created_at = None;
        response.updated_at = None;
        Ok(response)
    }

    fn delete_template(&self, auth: &Auth<'_>, id: i64) -> Result<()> {
        let mut state = self.begin(MockOp::Delete, auth)?;
        state.templates.remove(&id).map(|_| ()).ok_or_else(|| not_found(id))
    }
}
