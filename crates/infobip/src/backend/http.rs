//! HTTP backend for the Infobip email template API.
//!
//! Every call is a single blocking request. Non-2xx answers are turned into
//! [`Error::Api`] with the service's error text so that callers can show it
//! as-is; no request is ever retried.

use crate::auth::Auth;
use crate::backend::EmailApi;
use crate::error::{Error, Result};
use crate::types::{EmailTemplate, TemplateList, TemplateRequest};
use serde::de::DeserializeOwned;
use ureq::http::Response;
use ureq::{Agent, Body};

/// Path of the template collection, relative to the base URL.
const TEMPLATES_PATH: &str = "/email/2/templates";

/// HTTP email template backend.
///
/// # Example
///
/// ```no_run
/// use infobip::backend::EmailApi;
/// use infobip::backend::http::HttpEmailApi;
/// use infobip::{ApiKey, Auth};
///
/// let api = HttpEmailApi::new("xyz.api.infobip.com").unwrap();
/// let key = ApiKey::new("secret");
/// let templates = api.list_templates(&Auth::new(&key)).unwrap();
/// println!("Found {} templates", templates.len());
/// ```
pub struct HttpEmailApi {
    /// HTTP agent for requests.
    agent: Agent,
    /// Base URL with scheme and without trailing slash.
    base_url: String,
}

impl HttpEmailApi {
    /// Create a backend for the given base URL.
    ///
    /// A base URL without scheme is assumed to be HTTPS, which is how the
    /// Infobip portal displays it (`xyz.api.infobip.com`).
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let config = Agent::config_builder().http_status_as_error(false).build();
        Ok(Self {
            agent: Agent::new_with_config(config),
            base_url,
        })
    }

    /// Get the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn templates_url(&self) -> String {
        format!("{}{}", self.base_url, TEMPLATES_PATH)
    }

    fn template_url(&self, id: i64) -> String {
        format!("{}{}/{}", self.base_url, TEMPLATES_PATH, id)
    }
}

impl EmailApi for HttpEmailApi {
    fn list_templates(&self, auth: &Auth<'_>) -> Result<Vec<EmailTemplate>> {
        let url = self.templates_url();
        log::debug!("GET {url}");

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &auth.header_value())
            .header("Accept", "application/json")
            .call()?;

        let list: TemplateList = read_json(response)?;
        list.results
            .ok_or_else(|| Error::InvalidResponse("expected a \"results\" array".to_string()))
    }

    fn create_template(
        &self,
        auth: &Auth<'_>,
        request: &TemplateRequest,
    ) -> Result<EmailTemplate> {
        let url = self.templates_url();
        log::debug!("POST {url} (name: {})", request.name);

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &auth.header_value())
            .header("Accept", "application/json")
            .send_json(request)?;

        read_json(response)
    }

    fn get_template(&self, auth: &Auth<'_>, id: i64) -> Result<EmailTemplate> {
        let url = self.template_url(id);
        log::debug!("GET {url}");

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &auth.header_value())
            .header("Accept", "application/json")
            .call()?;

        read_json(response)
    }

    fn update_template(
        &self,
        auth: &Auth<'_>,
        id: i64,
        request: &TemplateRequest,
    ) -> Result<EmailTemplate> {
        let url = self.template_url(id);
        log::debug!("PUT {url}");

        let response = self
            .agent
            .put(&url)
            .header("Authorization", &auth.header_value())
            .header("Accept", "application/json")
            .send_json(request)?;

        read_json(response)
    }

    fn delete_template(&self, auth: &Auth<'_>, id: i64) -> Result<()> {
        let url = self.template_url(id);
        log::debug!("DELETE {url}");

        let response = self
            .agent
            .delete(&url)
            .header("Authorization", &auth.header_value())
            .call()?;

        check_status(response).map(|_| ())
    }
}

/// Pass 2xx responses through, turn everything else into [`Error::Api`].
fn check_status(mut response: Response<Body>) -> Result<Response<Body>> {
    let status = response.status();
    log::debug!("HTTP {}", status.as_u16());
    if status.is_success() {
        return Ok(response);
    }
    let body = response.body_mut().read_to_string().unwrap_or_else(|e| {
        log::debug!("Could not read error body of HTTP {}: {e}", status.as_u16());
        String::new()
    });
    Err(Error::from_response(status.as_u16(), &body))
}

fn read_json<T: DeserializeOwned>(response: Response<Body>) -> Result<T> {
    let mut response = check_status(response)?;
    Ok(response.body_mut().read_json()?)
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(Error::InvalidBaseUrl(raw.to_string()));
    }
    if trimmed.contains("://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("https://{trimmed}"))
    }
}
