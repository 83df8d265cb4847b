//! Diff computation for resource instances

use serde::{Deserialize, Serialize};
use std::fmt;

/// What applying a plan will do to one instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Create,
    Update,
    Delete,
    NoOp,
}

impl Action {
    /// Symbol used in plan output
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Create => "+",
            Self::Update => "~",
            Self::Delete => "-",
            Self::NoOp => " ",
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoOp)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::NoOp => "no-op",
        };
        f.write_str(verb)
    }
}

/// A single attribute whose value changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    pub attribute: String,
    /// Value before, `None` if unset
    pub before: Option<String>,
    /// Value after, `None` if unset
    pub after: Option<String>,
}

impl AttributeChange {
    pub fn new(
        attribute: impl Into<String>,
        before: Option<impl Into<String>>,
        after: Option<impl Into<String>>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            before: before.map(Into::into),
            after: after.map(Into::into),
        }
    }

    /// Whether before and after actually differ
    pub fn is_change(&self) -> bool {
        self.before != self.after
    }
}

/// The planned change for one instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDiff {
    /// Local address of the instance (e.g. "welcome")
    pub address: String,
    /// Type of the resource
    pub resource_type: String,
    /// Remote identifier, if the instance exists yet
    pub id: Option<String>,
    pub action: Action,
    /// Attributes that change; empty for no-ops
    pub changes: Vec<AttributeChange>,
}

impl ResourceDiff {
    /// Fully qualified address ("type.address")
    pub fn qualified_address(&self) -> String {
        format!("{}.{}", self.resource_type, self.address)
    }
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Number of instances to create
    pub additions: usize,
    /// Number of instances to update in place
    pub modifications: usize,
    /// Number of instances to delete
    pub removals: usize,
    /// Number of instances left alone
    pub unchanged: usize,
}

impl DiffSummary {
    /// Create a summary from a list of diffs
    pub fn from_diffs<'a>(diffs: impl IntoIterator<Item = &'a ResourceDiff>) -> Self {
        let mut summary = Self::default();
        for diff in diffs {
            match diff.action {
                Action::Create => summary.additions += 1,
                Action::Update => summary.modifications += 1,
                Action::Delete => summary.removals += 1,
                Action::NoOp => summary.unchanged += 1,
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.modifications + self.removals
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff(address: &str, action: Action) -> ResourceDiff {
        ResourceDiff {
            address: address.to_string(),
            resource_type: "acme_note".to_string(),
            id: None,
            action,
            changes: Vec::new(),
        }
    }

    #[test]
    fn test_summary_from_diffs() {
        let diffs = vec![
            diff("a", Action::Create),
            diff("b", Action::Update),
            diff("c", Action::NoOp),
            diff("d", Action::Delete),
            diff("e", Action::Create),
        ];
        let summary = DiffSummary::from_diffs(&diffs);
        assert_eq!(summary.additions, 2);
        assert_eq!(summary.modifications, 1);
        assert_eq!(summary.removals, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.total(), 4);
        assert!(summary.has_changes());
    }

    #[test]
    fn test_empty_summary() {
        let summary = DiffSummary::from_diffs(&[diff("a", Action::NoOp)]);
        assert!(!summary.has_changes());
    }

    #[test]
    fn test_attribute_change() {
        assert!(AttributeChange::new("subject", Some("a"), Some("b")).is_change());
        assert!(!AttributeChange::new("subject", Some("a"), Some("a")).is_change());
        assert!(AttributeChange::new("reply_to", None::<String>, Some("x")).is_change());
    }

    #[test]
    fn test_qualified_address_and_symbols() {
        assert_eq!(diff("a", Action::Create).qualified_address(), "acme_note.a");
        assert_eq!(Action::Update.symbol(), "~");
        assert_eq!(Action::Delete.to_string(), "delete");
        assert!(!Action::NoOp.is_change());
    }
}
