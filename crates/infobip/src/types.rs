//! Wire types for the email template endpoints.

use serde::{Deserialize, Serialize, Serializer};

/// An email template as returned by the service.
///
/// The service omits most optional fields when they are unset, and does not
/// return timestamps from create or update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub from: String,
    pub reply_to: Option<String>,
    #[serde(default)]
    pub subject: String,
    pub preheader: Option<String>,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub is_html_editable: bool,
    pub landing_page_id: Option<String>,
    pub image_preview_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Body of a create or update call.
///
/// Update is a full replace: every mutable field is sent each time. Unset
/// optionals go out as `""`, since the service keeps fields missing from the
/// body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRequest {
    pub name: String,
    pub from: String,
    #[serde(serialize_with = "empty_when_unset")]
    pub reply_to: Option<String>,
    pub subject: String,
    #[serde(serialize_with = "empty_when_unset")]
    pub preheader: Option<String>,
    pub html: String,
    #[serde(serialize_with = "empty_when_unset")]
    pub landing_page: Option<String>,
}

fn empty_when_unset<S: Serializer>(
    value: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or_default())
}

/// Envelope of the list call.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TemplateList {
    pub results: Option<Vec<EmailTemplate>>,
}
