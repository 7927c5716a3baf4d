//! Organization roles.

use serde::Serialize;

use coffer_shared::types::OrganizationId;

use crate::authorization::capability::Capability;
use crate::policy::PolicyRule;

/// A principal's effective role within one organization.
///
/// Built by the authorization gate from the policy engine; every flag is the
/// outcome of one `enforce` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Organization the role applies to.
    pub organization_id: OrganizationId,
    /// Role names held, including inherited ones.
    pub names: Vec<String>,
    /// May create wallets.
    pub allow_create_wallets: bool,
    /// May delete wallets.
    pub allow_delete_wallets: bool,
    /// May record transactions.
    pub allow_create_transactions: bool,
    /// May review transactions.
    pub allow_approve_transactions: bool,
    /// May grant and revoke roles.
    pub allow_manage_members: bool,
}

impl Role {
    /// Creates a role with no capabilities.
    #[must_use]
    pub fn new(organization_id: OrganizationId, names: Vec<String>) -> Self {
        Self {
            organization_id,
            names,
            allow_create_wallets: false,
            allow_delete_wallets: false,
            allow_create_transactions: false,
            allow_approve_transactions: false,
            allow_manage_members: false,
        }
    }

    /// Sets a capability flag.
    pub fn set(&mut self, capability: Capability, allowed: bool) {
        match capability {
            Capability::AllowCreateWallets => self.allow_create_wallets = allowed,
            Capability::AllowDeleteWallets => self.allow_delete_wallets = allowed,
            Capability::AllowCreateTransactions => self.allow_create_transactions = allowed,
            Capability::AllowApproveTransactions => self.allow_approve_transactions = allowed,
            Capability::AllowManageMembers => self.allow_manage_members = allowed,
        }
    }

    /// Reads a capability flag.
    #[must_use]
    pub const fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::AllowCreateWallets => self.allow_create_wallets,
            Capability::AllowDeleteWallets => self.allow_delete_wallets,
            Capability::AllowCreateTransactions => self.allow_create_transactions,
            Capability::AllowApproveTransactions => self.allow_approve_transactions,
            Capability::AllowManageMembers => self.allow_manage_members,
        }
    }
}

/// A named role and the capabilities its policy rules grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Role name, used as the policy subject.
    pub name: &'static str,
    /// Capabilities granted.
    pub capabilities: &'static [Capability],
}

/// Full control.
pub const OWNER: RoleDefinition = RoleDefinition {
    name: "owner",
    capabilities: &Capability::ALL,
};

/// Wallet management and transaction entry.
pub const TREASURER: RoleDefinition = RoleDefinition {
    name: "treasurer",
    capabilities: &[
        Capability::AllowCreateWallets,
        Capability::AllowDeleteWallets,
        Capability::AllowCreateTransactions,
    ],
};

/// Reviews other members' transactions.
pub const REVIEWER: RoleDefinition = RoleDefinition {
    name: "reviewer",
    capabilities: &[Capability::AllowApproveTransactions],
};

/// Records transactions.
pub const MEMBER: RoleDefinition = RoleDefinition {
    name: "member",
    capabilities: &[Capability::AllowCreateTransactions],
};

/// Roles installed into every new organization.
pub const BUILTIN_ROLES: [RoleDefinition; 4] = [OWNER, TREASURER, REVIEWER, MEMBER];

impl RoleDefinition {
    /// Looks up a built-in role by name.
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        BUILTIN_ROLES.into_iter().find(|role| role.name == name)
    }

    /// Policy rules granting this role's capabilities within `organization_id`.
    #[must_use]
    pub fn policies_for(&self, organization_id: OrganizationId) -> Vec<PolicyRule> {
        let domain = organization_id.to_string();
        self.capabilities
            .iter()
            .map(|capability| {
                PolicyRule::new(self.name, &domain, capability.object(), capability.action())
            })
            .collect()
    }
}
