//! Policy tuples.

use serde::{Deserialize, Serialize};

/// A permission rule: `subject` may perform `action` on `object` within `domain`.
///
/// Rules only ever grant; a request with no matching rule is denied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Role (or principal) the rule applies to.
    pub subject: String,
    /// Organization scope.
    pub domain: String,
    /// Resource type.
    pub object: String,
    /// Verb.
    pub action: String,
}

impl PolicyRule {
    /// Creates a rule.
    #[must_use]
    pub fn new(subject: &str, domain: &str, object: &str, action: &str) -> Self {
        Self {
            subject: subject.to_string(),
            domain: domain.to_string(),
            object: object.to_string(),
            action: action.to_string(),
        }
    }

    /// Parses a stored `p` row. Returns `None` when fields are missing.
    #[must_use]
    pub fn from_values(values: &[String]) -> Option<Self> {
        match values {
            [subject, domain, object, action, ..] => Some(Self::new(subject, domain, object, action)),
            _ => None,
        }
    }

    /// The `p` row in request order.
    #[must_use]
    pub fn to_values(&self) -> Vec<String> {
        vec![
            self.subject.clone(),
            self.domain.clone(),
            self.object.clone(),
            self.action.clone(),
        ]
    }
}

/// Grouping edge: `subject` holds `role` within `domain`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Principal (or role, for role inheritance).
    pub subject: String,
    /// Role being granted.
    pub role: String,
    /// Organization scope.
    pub domain: String,
}

impl RoleAssignment {
    /// Creates a grouping edge.
    #[must_use]
    pub fn new(subject: &str, role: &str, domain: &str) -> Self {
        Self {
            subject: subject.to_string(),
            role: role.to_string(),
            domain: domain.to_string(),
        }
    }

    /// Parses a stored `g` row. Returns `None` when fields are missing.
    #[must_use]
    pub fn from_values(values: &[String]) -> Option<Self> {
        match values {
            [subject, role, domain, ..] => Some(Self::new(subject, role, domain)),
            _ => None,
        }
    }

    /// The `g` row.
    #[must_use]
    pub fn to_values(&self) -> Vec<String> {
        vec![self.subject.clone(), self.role.clone(), self.domain.clone()]
    }
}

/// Everything the policy repository holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicySnapshot {
    /// Permission rules.
    pub rules: Vec<PolicyRule>,
    /// Grouping edges.
    pub assignments: Vec<RoleAssignment>,
}
