//! `pocinfobipemails_email_template` resource
//!
//! Maps the local template model onto the email template endpoints. The
//! remote id is the only correlation key: after create every call addresses
//! the template by id, never by name.

use crate::html::{self, HtmlWhitespaceInsensitive};
use crate::provider::ProviderClient;
use chrono::{SecondsFormat, Utc};
use declarative::{
    Attribute, AttributeChange, Diagnostic, Resource, Response, Schema, StringPlanModifier,
    StringRequest,
};
use infobip::{EmailTemplate, TemplateRequest, parse_template_id};
use serde::{Deserialize, Serialize};

/// Registered type name, `<provider>_email_template`
pub const TYPE_NAME: &str = "pocinfobipemails_email_template";

/// Declared attributes of one template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailTemplateConfig {
    pub name: String,
    pub from: String,
    pub subject: String,
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preheader: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_page: Option<String>,
}

/// Recorded state of one template
///
/// Optional attributes are `None` rather than empty so that an unset value
/// in config and an empty value from the service compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplateModel {
    /// Remote id, empty until the template is created
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub from: String,
    pub subject: String,
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preheader: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_page: Option<String>,
    #[serde(default)]
    pub is_html_editable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl EmailTemplateModel {
    /// Body of a create or update call: every mutable attribute
    fn to_request(&self) -> TemplateRequest {
        TemplateRequest {
            name: self.name.clone(),
            from: self.from.clone(),
            reply_to: self.reply_to.clone(),
            subject: self.subject.clone(),
            preheader: self.preheader.clone(),
            html: self.html.clone(),
            landing_page: self.landing_page.clone(),
        }
    }

    /// Model as reported by the service, with HTML normalized
    fn from_remote(template: EmailTemplate) -> Self {
        Self {
            id: template.id.to_string(),
            name: template.name,
            from: template.from,
            subject: template.subject,
            html: html::normalize(&template.html),
            reply_to: non_empty(template.reply_to),
            preheader: non_empty(template.preheader),
            landing_page: non_empty(template.landing_page_id),
            is_html_editable: template.is_html_editable,
            image_preview_url: non_empty(template.image_preview_url),
            created_at: non_empty(template.created_at),
            updated_at: non_empty(template.updated_at),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Lifecycle handler for email templates
#[derive(Debug, Clone)]
pub struct EmailTemplateResource {
    client: ProviderClient,
}

impl EmailTemplateResource {
    pub fn new(client: ProviderClient) -> Self {
        Self { client }
    }

    /// Schema of the resource, available without a configured client
    pub fn schema_definition() -> Schema {
        Schema::new("Manages an Infobip Email Template resource.")
            .with_attribute(
                "id",
                Attribute::computed_string()
                    .with_description("Unique identifier of the email template."),
            )
            .with_attribute(
                "name",
                Attribute::required_string().with_description("Name of the email template."),
            )
            .with_attribute(
                "from",
                Attribute::required_string()
                    .with_description("Sender email address used in the template."),
            )
            .with_attribute(
                "reply_to",
                Attribute::optional_string()
                    .with_description("Reply-to email address for the template."),
            )
            .with_attribute(
                "subject",
                Attribute::required_string()
                    .with_description("Subject line of the email template."),
            )
            .with_attribute(
                "preheader",
                Attribute::optional_string()
                    .with_description("Preheader text shown in email previews (optional)."),
            )
            .with_attribute(
                "html",
                Attribute::required_string()
                    .with_description("HTML content of the email template.")
                    .with_plan_modifier(&HtmlWhitespaceInsensitive),
            )
            .with_attribute(
                "is_html_editable",
                Attribute::computed_bool().with_description(
                    "Indicates whether the HTML content can be edited in Infobip UI.",
                ),
            )
            .with_attribute(
                "landing_page",
                Attribute::optional_computed_string()
                    .with_description("Associated landing page ID, if any."),
            )
            .with_attribute(
                "image_preview_url",
                Attribute::computed_string()
                    .with_description("URL of the email template's image preview."),
            )
            .with_attribute(
                "created_at",
                Attribute::computed_string().with_description(
                    "Timestamp when the email template was created (RFC3339 format).",
                ),
            )
            .with_attribute(
                "updated_at",
                Attribute::computed_string().with_description(
                    "Timestamp when the email template was last updated (RFC3339 format).",
                ),
            )
    }

    fn invalid_id(summary: &str, id: &str, err: &infobip::Error) -> Diagnostic {
        Diagnostic::error(
            summary,
            format!("The recorded id {id:?} cannot address an email template: {err}"),
        )
        .with_attribute("id")
    }
}

impl Resource for EmailTemplateResource {
    type Config = EmailTemplateConfig;
    type Model = EmailTemplateModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Self::schema_definition()
    }

    fn instance_id(&self, model: &EmailTemplateModel) -> Option<String> {
        (!model.id.is_empty()).then(|| model.id.clone())
    }

    fn plan(
        &self,
        config: &EmailTemplateConfig,
        prior: Option<&EmailTemplateModel>,
    ) -> EmailTemplateModel {
        let html = HtmlWhitespaceInsensitive
            .plan_modify_string(StringRequest {
                state_value: prior.map(|p| p.html.as_str()),
                plan_value: Some(&config.html),
            })
            .unwrap_or_else(|| config.html.clone());

        // Optional + computed: an unset value keeps whatever the service chose.
        let landing_page = non_empty(config.landing_page.clone())
            .or_else(|| prior.and_then(|p| p.landing_page.clone()));

        let computed = prior.cloned().unwrap_or_default();
        EmailTemplateModel {
            name: config.name.clone(),
            from: config.from.clone(),
            subject: config.subject.clone(),
            html,
            reply_to: non_empty(config.reply_to.clone()),
            preheader: non_empty(config.preheader.clone()),
            landing_page,
            ..computed
        }
    }

    fn changes(
        &self,
        before: Option<&EmailTemplateModel>,
        after: Option<&EmailTemplateModel>,
    ) -> Vec<AttributeChange> {
        type Getter = fn(&EmailTemplateModel) -> Option<&str>;
        let attributes: [(&str, Getter); 7] = [
            ("name", |m| Some(m.name.as_str())),
            ("from", |m| Some(m.from.as_str())),
            ("reply_to", |m| m.reply_to.as_deref()),
            ("subject", |m| Some(m.subject.as_str())),
            ("preheader", |m| m.preheader.as_deref()),
            ("html", |m| Some(m.html.as_str())),
            ("landing_page", |m| m.landing_page.as_deref()),
        ];

        attributes
            .into_iter()
            .map(|(name, get)| {
                AttributeChange::new(name, before.and_then(get), after.and_then(get))
            })
            .filter(AttributeChange::is_change)
            .collect()
    }

    fn create(&self, plan: EmailTemplateModel) -> Response<EmailTemplateModel> {
        log::info!("Creating email template {:?}", plan.name);

        let created = match self
            .client
            .api()
            .create_template(&self.client.auth(), &plan.to_request())
        {
            Ok(created) => created,
            Err(err) => {
                return Response::failed(
                    None,
                    Diagnostic::error(
                        "Error Creating Email Template",
                        format!(
                            "An error was encountered while creating the email template: {err}"
                        ),
                    ),
                );
            }
        };

        let stamp = now();
        let model = EmailTemplateModel {
            created_at: Some(stamp.clone()),
            updated_at: Some(stamp),
            ..EmailTemplateModel::from_remote(created)
        };
        log::debug!("Created email template {}", model.id);
        Response::ok(model)
    }

    fn read(&self, state: EmailTemplateModel) -> Response<EmailTemplateModel> {
        const SUMMARY: &str = "Error Reading Email Template";

        let id = match parse_template_id(&state.id) {
            Ok(id) => id,
            Err(err) => {
                let diagnostic = Self::invalid_id(SUMMARY, &state.id, &err);
                return Response::failed(Some(state), diagnostic);
            }
        };

        match self.client.api().get_template(&self.client.auth(), id) {
            Ok(remote) => {
                let fresh = EmailTemplateModel::from_remote(remote);
                // The service may omit timestamps; keep the ones recorded locally.
                Response::ok(EmailTemplateModel {
                    created_at: fresh.created_at.clone().or(state.created_at),
                    updated_at: fresh.updated_at.clone().or(state.updated_at),
                    ..fresh
                })
            }
            Err(err) => {
                let detail = format!("Could not read email template ID {}: {err}", state.id);
                Response::failed(Some(state), Diagnostic::error(SUMMARY, detail))
            }
        }
    }

    fn update(
        &self,
        plan: EmailTemplateModel,
        prior: EmailTemplateModel,
    ) -> Response<EmailTemplateModel> {
        const SUMMARY: &str = "Error Updating Email Template";

        let id = match parse_template_id(&prior.id) {
            Ok(id) => id,
            Err(err) => {
                let diagnostic = Self::invalid_id(SUMMARY, &prior.id, &err);
                return Response::failed(Some(prior), diagnostic);
            }
        };
        log::info!("Updating email template {id}");

        match self
            .client
            .api()
            .update_template(&self.client.auth(), id, &plan.to_request())
        {
            Ok(updated) => {
                let created_at = prior
                    .created_at
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(now);
                Response::ok(EmailTemplateModel {
                    id: prior.id,
                    created_at: Some(created_at),
                    updated_at: Some(now()),
                    ..EmailTemplateModel::from_remote(updated)
                })
            }
            Err(err) => Response::failed(
                Some(prior),
                Diagnostic::error(
                    SUMMARY,
                    format!("An error was encountered while updating the email template: {err}"),
                ),
            ),
        }
    }

    fn delete(&self, state: EmailTemplateModel) -> Response<EmailTemplateModel> {
        const SUMMARY: &str = "Error Deleting Email Template";

        let id = match parse_template_id(&state.id) {
            Ok(id) => id,
            Err(err) => {
                let diagnostic = Self::invalid_id(SUMMARY, &state.id, &err);
                return Response::failed(Some(state), diagnostic);
            }
        };
        log::info!("Deleting email template {id}");

        match self.client.api().delete_template(&self.client.auth(), id) {
            Ok(()) => Response::removed(),
            Err(err) if err.is_not_found() => {
                log::info!("Email template {id} already deleted; removing from state");
                Response::removed()
            }
            Err(err) => Response::failed(
                Some(state),
                Diagnostic::error(
                    SUMMARY,
                    format!("An error was encountered while deleting the email template: {err}"),
                ),
            ),
        }
    }

    fn import_state(&self, id: &str) -> Response<EmailTemplateModel> {
        Response::ok(EmailTemplateModel {
            id: id.to_string(),
            ..Default::default()
        })
    }
}
