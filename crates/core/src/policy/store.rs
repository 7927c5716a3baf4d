//! Durable policy storage.

use async_trait::async_trait;

use crate::policy::types::{PolicyRule, PolicySnapshot, RoleAssignment};
use crate::store::StoreError;

/// Repository holding permission rules and grouping edges.
///
/// The engine loads a full snapshot at start-up and writes every mutation
/// through before the enforcer model changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Loads every rule and grouping edge.
    async fn load_policies(&self) -> Result<PolicySnapshot, StoreError>;

    /// Persists a rule. Storing an existing rule is not an error.
    async fn save_rule(&self, rule: &PolicyRule) -> Result<(), StoreError>;

    /// Removes a rule if present.
    async fn remove_rule(&self, rule: &PolicyRule) -> Result<(), StoreError>;

    /// Persists a grouping edge. Storing an existing edge is not an error.
    async fn save_assignment(&self, assignment: &RoleAssignment) -> Result<(), StoreError>;

    /// Removes a grouping edge if present.
    async fn remove_assignment(&self, assignment: &RoleAssignment) -> Result<(), StoreError>;
}
