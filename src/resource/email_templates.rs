//! `pocinfobipemails_email_templates` data source
//!
//! Read-only listing of every template on the account, including the ones
//! not managed here.

use crate::provider::ProviderClient;
use declarative::{Diagnostic, Diagnostics};
use serde::Serialize;

pub const TYPE_NAME: &str = "pocinfobipemails_email_templates";

/// One listed template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Fetch every template, ordered by id
pub fn read(client: &ProviderClient) -> Result<Vec<TemplateSummary>, Diagnostics> {
    let mut templates = client
        .api()
        .list_templates(&client.auth())
        .map_err(|err| {
            Diagnostics::from(Diagnostic::error(
                "Unable to Read Email Templates",
                format!("An error was encountered while listing email templates: {err}"),
            ))
        })?;

    templates.sort_by_key(|t| t.id);
    log::debug!("Listed {} email template(s)", templates.len());

    Ok(templates
        .into_iter()
        .map(|t| TemplateSummary {
            id: t.id.to_string(),
            name: t.name,
            subject: t.subject,
            updated_at: t.updated_at.filter(|u| !u.is_empty()),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use infobip::{ApiKey, EmailApi, MockEmailApi, MockOp, TemplateRequest};
    use std::sync::Arc;

    fn client(mock: &MockEmailApi) -> ProviderClient {
        ProviderClient::configure(Arc::new(mock.clone()), ApiKey::new("key")).unwrap()
    }

    #[test]
    fn test_read_lists_everything() {
        let mock = MockEmailApi::new();
        let key = ApiKey::new("key");
        for name in ["b", "a"] {
            mock.create_template(
                &infobip::Auth::new(&key),
                &TemplateRequest {
                    name: name.to_string(),
                    subject: format!("Subject {name}"),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let listed = read(&client(&mock)).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "1");
        assert_eq!(listed[0].name, "b");
        assert_eq!(listed[1].subject, "Subject a");
    }

    #[test]
    fn test_read_failure() {
        let mock = MockEmailApi::new();
        let client = client(&mock);
        mock.fail(MockOp::List, 503, "SERVICE_UNAVAILABLE");

        let diagnostics = read(&client).unwrap_err();
        assert!(diagnostics.first_error().unwrap().detail.contains("503"));
    }
}
