//! Organization creation, membership view and role management.

use std::sync::Arc;

use coffer_shared::error::FieldErrors;
use coffer_shared::types::{OrganizationId, UserId};

use crate::authorization::{AuthorizationGate, BUILTIN_ROLES, OWNER, RoleDefinition};
use crate::organization::error::OrganizationError;
use crate::organization::types::{Organization, OrganizationView};
use crate::policy::PolicyError;
use crate::store::{OrganizationStore, PrincipalStore};

/// Organization lifecycle operations.
#[derive(Clone)]
pub struct OrganizationService {
    organizations: Arc<dyn OrganizationStore>,
    principals: Arc<dyn PrincipalStore>,
    gate: AuthorizationGate,
}

impl std::fmt::Debug for OrganizationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrganizationService").finish_non_exhaustive()
    }
}

impl OrganizationService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        organizations: Arc<dyn OrganizationStore>,
        principals: Arc<dyn PrincipalStore>,
        gate: AuthorizationGate,
    ) -> Self {
        Self {
            organizations,
            principals,
            gate,
        }
    }

    /// Creates an organization, installs the built-in roles for it and makes
    /// `creator` its owner.
    pub async fn create_organization(
        &self,
        creator: UserId,
        name: &str,
    ) -> Result<Organization, OrganizationError> {
        let name = name.trim();
        if name.is_empty() {
            let mut errors = FieldErrors::new();
            errors.insert("name".to_string(), "Name is required".to_string());
            return Err(OrganizationError::Validation(errors));
        }

        let organization = self.organizations.create_organization(name).await?;
        let engine = self.gate.engine();

        for definition in BUILTIN_ROLES {
            for rule in definition.policies_for(organization.id) {
                engine.add_policy(rule).await?;
            }
        }
        engine
            .add_role_for_user(
                &creator.to_string(),
                OWNER.name,
                &organization.id.to_string(),
            )
            .await?;

        tracing::info!(
            organization_id = %organization.id,
            owner = %creator,
            "organization created"
        );
        Ok(organization)
    }

    /// Returns the organization with the caller's role. Members only.
    pub async fn view_organization(
        &self,
        principal: UserId,
        organization_id: OrganizationId,
    ) -> Result<OrganizationView, OrganizationError> {
        let role = self
            .gate
            .require_membership(principal, organization_id)
            .await?;

        let organization = self
            .organizations
            .find_organization(organization_id)
            .await?
            .ok_or(OrganizationError::NotFound)?;

        Ok(OrganizationView { organization, role })
    }

    /// Grants a built-in role to a user. Requires `allowManageMembers`.
    ///
    /// Returns false when the user already held the role.
    pub async fn grant_role(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        target: UserId,
        role: &str,
    ) -> Result<bool, OrganizationError> {
        let definition = self
            .authorize_role_change(actor, organization_id, target, role)
            .await?;

        let granted = self
            .gate
            .engine()
            .add_role_for_user(
                &target.to_string(),
                definition.name,
                &organization_id.to_string(),
            )
            .await?;

        if granted {
            tracing::info!(
                organization_id = %organization_id,
                actor = %actor,
                target = %target,
                role = definition.name,
                "role granted"
            );
        }
        Ok(granted)
    }

    /// Revokes a role from a user. Requires `allowManageMembers`.
    ///
    /// The last owner of an organization cannot be removed. Returns false
    /// when the user did not hold the role.
    pub async fn revoke_role(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        target: UserId,
        role: &str,
    ) -> Result<bool, OrganizationError> {
        let definition = self
            .authorize_role_change(actor, organization_id, target, role)
            .await?;

        let engine = self.gate.engine();
        let domain = organization_id.to_string();
        let subject = target.to_string();

        let revoked = if definition == OWNER {
            match engine
                .delete_role_unless_last(&subject, OWNER.name, &domain)
                .await
            {
                Err(PolicyError::LastHolder { .. }) => return Err(OrganizationError::LastOwner),
                other => other?,
            }
        } else {
            engine
                .delete_role_for_user(&subject, definition.name, &domain)
                .await?
        };

        if revoked {
            tracing::info!(
                organization_id = %organization_id,
                actor = %actor,
                target = %target,
                role = definition.name,
                "role revoked"
            );
        }
        Ok(revoked)
    }

    async fn authorize_role_change(
        &self,
        actor: UserId,
        organization_id: OrganizationId,
        target: UserId,
        role: &str,
    ) -> Result<RoleDefinition, OrganizationError> {
        self.gate
            .require_authorization(actor, organization_id, |current| current.allow_manage_members)
            .await?;

        let definition = RoleDefinition::builtin(role)
            .ok_or_else(|| OrganizationError::UnknownRole(role.to_string()))?;

        if self.principals.find_principal(target).await?.is_none() {
            return Err(OrganizationError::UserNotFound);
        }

        Ok(definition)
    }
}
