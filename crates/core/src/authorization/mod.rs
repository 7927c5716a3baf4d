//! Authorization gate.
//!
//! Resolves a principal's effective [`Role`] within an organization and
//! applies a capability predicate to it.

mod capability;
mod error;
mod gate;
mod role;

pub use capability::Capability;
pub use error::AuthorizationError;
pub use gate::AuthorizationGate;
pub use role::{BUILTIN_ROLES, MEMBER, OWNER, REVIEWER, Role, RoleDefinition, TREASURER};
