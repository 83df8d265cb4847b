//! Diagnostics collected from lifecycle operations
//!
//! Operations never panic or bail on remote failures. They record what went
//! wrong here and hand the list back to the caller, which decides how to
//! render it and whether to stop.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// A single user-facing problem report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// One-line summary
    pub summary: String,
    /// Longer explanation, usually including the remote error text
    pub detail: String,
    /// Attribute the problem is about, if any (e.g. "base_url")
    pub attribute: Option<String>,
    /// Address of the resource instance the problem is about, if any
    pub address: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
            address: None,
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(summary, detail)
        }
    }

    /// Attach an attribute path
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.summary)?;
        match (&self.address, &self.attribute) {
            (Some(address), Some(attribute)) => write!(f, " ({address}.{attribute})")?,
            (Some(address), None) => write!(f, " ({address})")?,
            (None, Some(attribute)) => write!(f, " ({attribute})")?,
            (None, None) => {}
        }
        if !self.detail.is_empty() {
            write!(f, "\n\n{}", self.detail)?;
        }
        Ok(())
    }
}

/// Ordered list of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::error(summary, detail));
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::warning(summary, detail));
    }

    pub fn add_attribute_error(
        &mut self,
        attribute: impl Into<String>,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.push(Diagnostic::error(summary, detail).with_attribute(attribute));
    }

    /// Move every diagnostic of `other` to the end of this list
    pub fn append(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    /// Tag every diagnostic that isn't tied to an instance yet
    pub fn with_address(mut self, address: &str) -> Self {
        for diagnostic in &mut self.0 {
            if diagnostic.address.is_none() {
                diagnostic.address = Some(address.to_string());
            }
        }
        self
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.0.iter().filter(|d| d.is_error()).count()
    }

    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.0.iter().find(|d| d.is_error())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_are_not_errors() {
        let mut diags = Diagnostics::new();
        diags.add_warning("Deprecated", "use something else");
        assert!(!diags.has_error());
        assert_eq!(diags.len(), 1);

        diags.add_error("Boom", "it broke");
        assert!(diags.has_error());
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.first_error().unwrap().summary, "Boom");
    }

    #[test]
    fn test_append_keeps_order() {
        let mut first = Diagnostics::new();
        first.add_attribute_error("base_url", "Missing base url", "");
        let mut second = Diagnostics::new();
        second.add_attribute_error("api_key", "Missing API key", "");

        first.append(second);
        let attributes: Vec<_> = first
            .iter()
            .map(|d| d.attribute.clone().unwrap())
            .collect();
        assert_eq!(attributes, vec!["base_url", "api_key"]);
    }

    #[test]
    fn test_with_address_keeps_existing() {
        let mut diags = Diagnostics::new();
        diags.add_error("a", "");
        let mut tagged = Diagnostic::error("b", "");
        tagged.address = Some("other".to_string());
        diags.push(tagged);

        let diags = diags.with_address("welcome");
        let addresses: Vec<_> = diags.iter().map(|d| d.address.clone().unwrap()).collect();
        assert_eq!(addresses, vec!["welcome", "other"]);
    }

    #[test]
    fn test_display() {
        let mut diag = Diagnostic::error("Error Creating Email Template", "HTTP 400: bad");
        diag.address = Some("welcome".to_string());
        let text = diag.to_string();
        assert!(text.starts_with("Error: Error Creating Email Template (welcome)"));
        assert!(text.ends_with("HTTP 400: bad"));

        let attr = Diagnostic::error("Missing API key", "").with_attribute("api_key");
        assert_eq!(attr.to_string(), "Error: Missing API key (api_key)");
    }
}
