//! Capability flags and the policy tuples behind them.

use serde::{Deserialize, Serialize};

/// A named permission an organization role may carry.
///
/// Each capability maps to exactly one `(object, action)` pair evaluated by
/// the policy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// Create wallets in the organization.
    AllowCreateWallets,
    /// Delete wallets in the organization.
    AllowDeleteWallets,
    /// Record transactions.
    AllowCreateTransactions,
    /// Be named as reviewer of a transaction.
    AllowApproveTransactions,
    /// Grant and revoke organization roles.
    AllowManageMembers,
}

impl Capability {
    /// Every capability, in display order.
    pub const ALL: [Self; 5] = [
        Self::AllowCreateWallets,
        Self::AllowDeleteWallets,
        Self::AllowCreateTransactions,
        Self::AllowApproveTransactions,
        Self::AllowManageMembers,
    ];

    /// Resource type in the policy tuple.
    #[must_use]
    pub const fn object(self) -> &'static str {
        match self {
            Self::AllowCreateWallets | Self::AllowDeleteWallets => "wallet",
            Self::AllowCreateTransactions | Self::AllowApproveTransactions => "transaction",
            Self::AllowManageMembers => "member",
        }
    }

    /// Verb in the policy tuple.
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::AllowCreateWallets | Self::AllowCreateTransactions => "create",
            Self::AllowDeleteWallets => "delete",
            Self::AllowApproveTransactions => "approve",
            Self::AllowManageMembers => "manage",
        }
    }

    /// Flag name as exposed on a role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllowCreateWallets => "allowCreateWallets",
            Self::AllowDeleteWallets => "allowDeleteWallets",
            Self::AllowCreateTransactions => "allowCreateTransactions",
            Self::AllowApproveTransactions => "allowApproveTransactions",
            Self::AllowManageMembers => "allowManageMembers",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
