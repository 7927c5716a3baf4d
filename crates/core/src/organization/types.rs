//! Organization records.

use serde::Serialize;

use coffer_shared::types::OrganizationId;

use crate::authorization::Role;

/// A tenant. Every policy rule and wallet is scoped to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organization {
    /// Organization ID, also the policy domain.
    pub id: OrganizationId,
    /// Display name.
    pub name: String,
}

/// An organization as seen by one of its members.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationView {
    /// The organization.
    pub organization: Organization,
    /// The caller's effective role.
    pub role: Role,
}
