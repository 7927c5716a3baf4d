//! Role resolution and capability checks.

use std::sync::Arc;

use coffer_shared::types::{OrganizationId, UserId};

use crate::authorization::capability::Capability;
use crate::authorization::error::AuthorizationError;
use crate::authorization::role::Role;
use crate::policy::PolicyEngine;

/// Checks organization-scoped capabilities before mutating operations.
///
/// Membership and permission are separate steps: a principal with no role in
/// the organization is rejected even when the predicate would pass.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    engine: Arc<PolicyEngine>,
}

impl AuthorizationGate {
    /// Creates a gate over a shared policy engine.
    #[must_use]
    pub const fn new(engine: Arc<PolicyEngine>) -> Self {
        Self { engine }
    }

    /// The underlying policy engine.
    #[must_use]
    pub fn engine(&self) -> &Arc<PolicyEngine> {
        &self.engine
    }

    /// Derives the principal's effective role within the organization.
    ///
    /// Returns `None` when the principal holds no role there.
    pub async fn resolve_role(
        &self,
        principal: UserId,
        organization_id: OrganizationId,
    ) -> Option<Role> {
        let subject = principal.to_string();
        let domain = organization_id.to_string();

        let names = self.engine.roles_for_user(&subject, &domain).await;
        if names.is_empty() {
            return None;
        }

        let mut role = Role::new(organization_id, names.into_iter().collect());
        for capability in Capability::ALL {
            let allowed = self
                .engine
                .enforce(&subject, &domain, capability.object(), capability.action())
                .await;
            role.set(capability, allowed);
        }
        Some(role)
    }

    /// Resolves the principal's role and applies `predicate` to it.
    ///
    /// Pass `|_| true` for a plain membership check.
    pub async fn require_authorization<F>(
        &self,
        principal: UserId,
        organization_id: OrganizationId,
        predicate: F,
    ) -> Result<Role, AuthorizationError>
    where
        F: FnOnce(&Role) -> bool,
    {
        let Some(role) = self.resolve_role(principal, organization_id).await else {
            tracing::debug!(
                user_id = %principal,
                organization_id = %organization_id,
                "authorization denied: no role in organization"
            );
            return Err(AuthorizationError::NotMember);
        };

        if !predicate(&role) {
            tracing::debug!(
                user_id = %principal,
                organization_id = %organization_id,
                roles = ?role.names,
                "authorization denied: predicate failed"
            );
            return Err(AuthorizationError::Denied);
        }

        Ok(role)
    }

    /// Membership check with no capability requirement.
    pub async fn require_membership(
        &self,
        principal: UserId,
        organization_id: OrganizationId,
    ) -> Result<Role, AuthorizationError> {
        self.require_authorization(principal, organization_id, |_| true)
            .await
    }

    /// Requires one named capability.
    pub async fn require_capability(
        &self,
        principal: UserId,
        organization_id: OrganizationId,
        capability: Capability,
    ) -> Result<Role, AuthorizationError> {
        self.require_authorization(principal, organization_id, |role| role.allows(capability))
            .await
            .map_err(|err| match err {
                AuthorizationError::Denied => AuthorizationError::MissingCapability(capability),
                other => other,
            })
    }
}
