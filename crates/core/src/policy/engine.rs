//! Shared policy engine.
//!
//! One casbin [`Enforcer`] is built at start-up and shared by every request.
//! Reads take the read lock. Mutations take the write lock and go through the
//! [`StoreAdapter`], which persists before the enforcer's model changes, so
//! readers never observe a rule the repository does not hold.

use std::collections::BTreeSet;
use std::sync::Arc;

use casbin::{CoreApi, DefaultModel, Enforcer, MgmtApi};
use tokio::sync::RwLock;

use crate::policy::adapter::StoreAdapter;
use crate::policy::error::PolicyError;
use crate::policy::store::PolicyStore;
use crate::policy::types::{PolicyRule, RoleAssignment};

/// Request `(sub, dom, obj, act)`, grouping `g(user, role, dom)`, allow-if-any.
pub const RBAC_MODEL: &str = r#"
[request_definition]
r = sub, dom, obj, act

[policy_definition]
p = sub, dom, obj, act

[role_definition]
g = _, _, _

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = g(r.sub, p.sub, r.dom) && r.dom == p.dom && r.obj == p.obj && r.act == p.act
"#;

/// Offset of the role within a `g` row.
const ROLE_FIELD: usize = 1;

/// Domain-scoped RBAC enforcer backed by a durable repository.
pub struct PolicyEngine {
    enforcer: RwLock<Enforcer>,
}

impl std::fmt::Debug for PolicyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEngine").finish_non_exhaustive()
    }
}

fn holders(enforcer: &Enforcer, role: &str, domain: &str) -> BTreeSet<String> {
    enforcer
        .get_filtered_grouping_policy(ROLE_FIELD, vec![role.to_string(), domain.to_string()])
        .into_iter()
        .filter_map(|row| RoleAssignment::from_values(&row))
        .filter(|edge| edge.role == role && edge.domain == domain)
        .map(|edge| edge.subject)
        .collect()
}

impl PolicyEngine {
    /// Loads every rule and grouping edge from `store` into a new enforcer.
    pub async fn load(store: Arc<dyn PolicyStore>) -> Result<Self, PolicyError> {
        let model = DefaultModel::from_str(RBAC_MODEL).await?;
        let enforcer = Enforcer::new(model, StoreAdapter::new(store)).await?;

        tracing::info!(
            rules = enforcer.get_policy().len(),
            assignments = enforcer.get_grouping_policy().len(),
            "policy enforcer loaded"
        );

        Ok(Self {
            enforcer: RwLock::new(enforcer),
        })
    }

    /// Reloads every rule from the repository, discarding in-memory state.
    pub async fn reload(&self) -> Result<(), PolicyError> {
        let mut enforcer = self.enforcer.write().await;
        enforcer.load_policy().await?;

        tracing::info!(
            rules = enforcer.get_policy().len(),
            assignments = enforcer.get_grouping_policy().len(),
            "policy enforcer reloaded"
        );
        Ok(())
    }

    /// Evaluates `(subject, domain, object, action)`.
    ///
    /// Evaluation failures deny.
    pub async fn enforce(&self, subject: &str, domain: &str, object: &str, action: &str) -> bool {
        let allowed = match self
            .enforcer
            .read()
            .await
            .enforce((subject, domain, object, action))
        {
            Ok(allowed) => allowed,
            Err(err) => {
                tracing::warn!(subject, domain, object, action, error = %err, "policy evaluation failed");
                false
            }
        };

        tracing::trace!(subject, domain, object, action, allowed, "policy decision");
        allowed
    }

    /// Roles assigned directly to `user` within `domain`.
    pub async fn roles_for_user(&self, user: &str, domain: &str) -> BTreeSet<String> {
        self.enforcer
            .read()
            .await
            .get_filtered_grouping_policy(0, vec![user.to_string()])
            .into_iter()
            .filter_map(|row| RoleAssignment::from_values(&row))
            .filter(|edge| edge.subject == user && edge.domain == domain)
            .map(|edge| edge.role)
            .collect()
    }

    /// Subjects holding `role` directly within `domain`.
    pub async fn users_for_role(&self, role: &str, domain: &str) -> BTreeSet<String> {
        holders(&*self.enforcer.read().await, role, domain)
    }

    /// Adds a permission rule. Returns false if it already existed.
    pub async fn add_policy(&self, rule: PolicyRule) -> Result<bool, PolicyError> {
        let values = rule.to_values();
        let mut enforcer = self.enforcer.write().await;
        if enforcer.has_policy(values.clone()) {
            return Ok(false);
        }

        let added = enforcer.add_policy(values).await?;
        tracing::debug!(
            subject = %rule.subject,
            domain = %rule.domain,
            object = %rule.object,
            action = %rule.action,
            "policy added"
        );
        Ok(added)
    }

    /// Removes a permission rule. Returns false if it was absent.
    pub async fn remove_policy(&self, rule: &PolicyRule) -> Result<bool, PolicyError> {
        let values = rule.to_values();
        let mut enforcer = self.enforcer.write().await;
        if !enforcer.has_policy(values.clone()) {
            return Ok(false);
        }

        let removed = enforcer.remove_policy(values).await?;
        tracing::debug!(
            subject = %rule.subject,
            domain = %rule.domain,
            object = %rule.object,
            action = %rule.action,
            "policy removed"
        );
        Ok(removed)
    }

    /// Grants `role` to `user` within `domain`. Returns false if the edge
    /// already existed.
    pub async fn add_role_for_user(
        &self,
        user: &str,
        role: &str,
        domain: &str,
    ) -> Result<bool, PolicyError> {
        let values = RoleAssignment::new(user, role, domain).to_values();
        let mut enforcer = self.enforcer.write().await;
        if enforcer.has_grouping_policy(values.clone()) {
            return Ok(false);
        }

        let added = enforcer.add_grouping_policy(values).await?;
        tracing::debug!(user, role, domain, "role granted");
        Ok(added)
    }

    /// Revokes `role` from `user` within `domain`. Returns false if the edge
    /// was absent.
    pub async fn delete_role_for_user(
        &self,
        user: &str,
        role: &str,
        domain: &str,
    ) -> Result<bool, PolicyError> {
        let mut enforcer = self.enforcer.write().await;
        Self::revoke(&mut enforcer, user, role, domain).await
    }

    /// Revokes `role` from `user` unless `user` is its only holder in
    /// `domain`.
    ///
    /// The holder count and the removal happen under one write lock, so two
    /// concurrent calls can never remove the last two holders.
    pub async fn delete_role_unless_last(
        &self,
        user: &str,
        role: &str,
        domain: &str,
    ) -> Result<bool, PolicyError> {
        let mut enforcer = self.enforcer.write().await;
        let current = holders(&enforcer, role, domain);
        if current.len() == 1 && current.contains(user) {
            return Err(PolicyError::LastHolder {
                role: role.to_string(),
            });
        }
        Self::revoke(&mut enforcer, user, role, domain).await
    }

    async fn revoke(
        enforcer: &mut Enforcer,
        user: &str,
        role: &str,
        domain: &str,
    ) -> Result<bool, PolicyError> {
        let values = RoleAssignment::new(user, role, domain).to_values();
        if !enforcer.has_grouping_policy(values.clone()) {
            return Ok(false);
        }

        let removed = enforcer.remove_grouping_policy(values).await?;
        tracing::debug!(user, role, domain, "role revoked");
        Ok(removed)
    }
}
