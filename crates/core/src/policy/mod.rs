//! Domain-scoped role-based access control on casbin.
//!
//! Rules `p(sub, dom, obj, act)` grant a role (or principal) an action on a
//! resource type inside one organization. Grouping edges `g(user, role, dom)`
//! place users in roles per organization. Everything not granted is denied.

mod adapter;
mod engine;
mod error;
mod store;
mod types;

#[cfg(test)]
mod engine_props;

pub use adapter::StoreAdapter;
pub use engine::{PolicyEngine, RBAC_MODEL};
pub use error::PolicyError;
pub use store::PolicyStore;
pub use types::{PolicyRule, PolicySnapshot, RoleAssignment};
