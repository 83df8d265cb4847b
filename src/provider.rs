//! Provider configuration
//!
//! Resolves the base URL and API key, checks that they work with a single
//! list call, and hands out the [`ProviderClient`] every resource operation
//! goes through.

use crate::config::ProviderBlock;
use declarative::{Attribute, Diagnostic, Diagnostics, Schema};
use infobip::backend::http::HttpEmailApi;
use infobip::{ApiKey, Auth, EmailApi};
use std::sync::Arc;

/// Name under which resources and data sources are registered
pub const PROVIDER_TYPE_NAME: &str = "pocinfobipemails";

pub const BASE_URL_ENV: &str = "POCINFOBIPEMAILS_BASE_URL";
pub const API_KEY_ENV: &str = "POCINFOBIPEMAILS_API_KEY";

/// Provider settings with every value resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: ApiKey,
}

impl ProviderConfig {
    /// Resolve the provider block against the environment
    ///
    /// A value set in config wins, even when empty; an unset value is read
    /// from `env`. Every value still missing afterwards gets its own
    /// attribute error.
    pub fn resolve(
        block: &ProviderBlock,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Diagnostics> {
        let base_url = block
            .base_url
            .clone()
            .or_else(|| env(BASE_URL_ENV))
            .unwrap_or_default();
        let api_key = block
            .api_key
            .clone()
            .or_else(|| env(API_KEY_ENV))
            .unwrap_or_default();

        let mut diagnostics = Diagnostics::new();
        if base_url.is_empty() {
            diagnostics.add_attribute_error(
                "base_url",
                "Missing Infobip API base url",
                format!(
                    "The provider cannot create the Infobip API client as there is a missing or \
                     empty value for the Infobip API base url. Set the base_url value in the \
                     configuration or use the {BASE_URL_ENV} environment variable. If either is \
                     already set, ensure the value is not empty."
                ),
            );
        }
        if api_key.is_empty() {
            diagnostics.add_attribute_error(
                "api_key",
                "Missing Infobip API key",
                format!(
                    "The provider cannot create the Infobip API client as there is a missing or \
                     empty value for the Infobip API key. Set the api_key value in the \
                     configuration or use the {API_KEY_ENV} environment variable. If either is \
                     already set, ensure the value is not empty."
                ),
            );
        }

        if diagnostics.has_error() {
            return Err(diagnostics);
        }
        Ok(Self {
            base_url,
            api_key: ApiKey::new(api_key),
        })
    }

    /// Resolve against the process environment
    pub fn from_env(block: &ProviderBlock) -> Result<Self, Diagnostics> {
        Self::resolve(block, |name| std::env::var(name).ok())
    }
}

/// Handle shared by every resource operation
///
/// Immutable once configured. A fresh [`Auth`] is built for each call.
#[derive(Clone)]
pub struct ProviderClient {
    api: Arc<dyn EmailApi>,
    api_key: ApiKey,
}

impl ProviderClient {
    /// Verify `api` with one list call and wrap it
    ///
    /// Fails closed: if the call fails no client is produced.
    pub fn configure(api: Arc<dyn EmailApi>, api_key: ApiKey) -> Result<Self, Diagnostics> {
        log::info!("Configuring Infobip client");
        log::debug!("Verifying credentials (api_key: {api_key})");

        match api.list_templates(&Auth::new(&api_key)) {
            Ok(templates) => {
                log::debug!("Credentials accepted, {} template(s) visible", templates.len());
            }
            Err(err) => {
                let category = err.category();
                return Err(Diagnostic::error(
                    "Failed to fetch all email templates",
                    format!("{err}\n\n{category}: {}", category.advice()),
                )
                .into());
            }
        }

        log::info!("Configured Infobip client");
        Ok(Self { api, api_key })
    }

    /// Build the HTTP client for `config` and verify it
    pub fn connect(config: &ProviderConfig) -> Result<Self, Diagnostics> {
        log::debug!(
            "Creating Infobip client (base_url: {}, api_key: {})",
            config.base_url,
            config.api_key
        );
        let api = HttpEmailApi::new(&config.base_url).map_err(|err| {
            Diagnostics::from(
                Diagnostic::error("Invalid Infobip API base url", err.to_string())
                    .with_attribute("base_url"),
            )
        })?;
        Self::configure(Arc::new(api), config.api_key.clone())
    }

    pub fn api(&self) -> &dyn EmailApi {
        self.api.as_ref()
    }

    /// Authentication context for one call
    pub fn auth(&self) -> Auth<'_> {
        Auth::new(&self.api_key)
    }
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

/// Schema of the `[provider]` block
pub fn provider_schema() -> Schema {
    Schema::new("Manages email templates on the Infobip platform.")
        .with_attribute(
            "base_url",
            Attribute::optional_string().with_description(format!(
                "Base URL of the Infobip API, e.g. xyz.api.infobip.com. \
                 May also be provided via the {BASE_URL_ENV} environment variable."
            )),
        )
        .with_attribute(
            "api_key",
            Attribute::optional_string()
                .sensitive()
                .with_description(format!(
                    "Infobip API key. May also be provided via the {API_KEY_ENV} \
                     environment variable."
                )),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use infobip::{MockEmailApi, MockOp};
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn block(base_url: Option<&str>, api_key: Option<&str>) -> ProviderBlock {
        ProviderBlock {
            base_url: base_url.map(str::to_string),
            api_key: api_key.map(str::to_string),
        }
    }

    #[test]
    fn test_config_values_win() {
        let resolved = ProviderConfig::resolve(
            &block(Some("https://cfg.test"), Some("cfg-key")),
            env(&[(BASE_URL_ENV, "https://env.test"), (API_KEY_ENV, "env-key")]),
        )
        .unwrap();
        assert_eq!(resolved.base_url, "https://cfg.test");
        assert_eq!(resolved.api_key.expose(), "cfg-key");
    }

    #[test]
    fn test_env_fallback() {
        let resolved = ProviderConfig::resolve(
            &block(None, None),
            env(&[(BASE_URL_ENV, "https://env.test"), (API_KEY_ENV, "env-key")]),
        )
        .unwrap();
        assert_eq!(resolved.base_url, "https://env.test");
        assert_eq!(resolved.api_key.expose(), "env-key");
    }

    #[test]
    fn test_explicit_empty_does_not_fall_back() {
        let diagnostics = ProviderConfig::resolve(
            &block(Some(""), None),
            env(&[(BASE_URL_ENV, "https://env.test"), (API_KEY_ENV, "env-key")]),
        )
        .unwrap_err();
        assert_eq!(diagnostics.error_count(), 1);
        let error = diagnostics.first_error().unwrap();
        assert_eq!(error.summary, "Missing Infobip API base url");
        assert_eq!(error.attribute.as_deref(), Some("base_url"));
    }

    #[test]
    fn test_every_missing_value_reported() {
        let diagnostics = ProviderConfig::resolve(&block(None, None), env(&[])).unwrap_err();
        let attributes: Vec<_> = diagnostics
            .iter()
            .filter_map(|d| d.attribute.as_deref())
            .collect();
        assert_eq!(attributes, vec!["base_url", "api_key"]);
        assert!(
            diagnostics
                .iter()
                .all(|d| d.detail.contains("environment variable"))
        );
    }

    #[test]
    fn test_resolved_key_is_masked() {
        let resolved =
            ProviderConfig::resolve(&block(Some("https://x.test"), Some("s3cret")), env(&[]))
                .unwrap();
        assert!(!format!("{resolved:?}").contains("s3cret"));
    }

    #[test]
    fn test_configure_verifies_once() {
        let mock = MockEmailApi::new();
        let client =
            ProviderClient::configure(Arc::new(mock.clone()), ApiKey::new("key")).unwrap();
        assert_eq!(mock.calls(), vec![MockOp::List]);
        assert!(format!("{client:?}").contains("***"));
    }

    #[test]
    fn test_configure_fails_closed() {
        let mock = MockEmailApi::new().with_api_key(ApiKey::new("right"));
        let diagnostics =
            ProviderClient::configure(Arc::new(mock), ApiKey::new("wrong")).unwrap_err();
        let error = diagnostics.first_error().unwrap();
        assert_eq!(error.summary, "Failed to fetch all email templates");
        assert!(error.detail.contains("401"));
    }

    #[test]
    fn test_connect_rejects_bad_base_url() {
        let config = ProviderConfig {
            base_url: "not a url".to_string(),
            api_key: ApiKey::new("key"),
        };
        let diagnostics = ProviderClient::connect(&config).unwrap_err();
        assert_eq!(
            diagnostics.first_error().unwrap().attribute.as_deref(),
            Some("base_url")
        );
    }

    #[test]
    fn test_provider_schema() {
        let schema = provider_schema();
        assert!(schema.is_sensitive("api_key"));
        assert!(!schema.is_sensitive("base_url"));
        assert!(schema.required().is_empty());
    }
}
