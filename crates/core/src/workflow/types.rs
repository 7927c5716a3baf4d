//! Workflow domain types for wallets and their transactions.
//!
//! A transaction moves through `TransactionDraft` (raw input) to
//! `ValidatedTransaction` (well-formed, unsigned) to `PricedTransaction`
//! (authorized, signed) and finally `TransactionRecord` (committed).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use coffer_shared::types::{
    Money, OrganizationId, PageResponse, TransactionId, UserId, WalletId,
};

/// Direction of a transaction relative to its wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Funds entering the wallet.
    In,
    /// Funds leaving the wallet, stored as a negative value.
    Out,
}

impl TransactionKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }

    /// Parses a kind. Only the exact lowercase names are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction input exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    /// `in` or `out`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Milliseconds since the Unix epoch, as a digit string.
    #[serde(default)]
    pub spend_date_time: Option<String>,
    /// Non-negative decimal with at most two fractional digits.
    #[serde(default)]
    pub transaction_value: Option<String>,
    /// Reviewer username.
    #[serde(default)]
    pub reviewer: Option<String>,
    /// Free text.
    #[serde(default)]
    pub notes: Option<String>,
}

/// A well-formed transaction that has not been authorized yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransaction {
    /// Direction.
    pub kind: TransactionKind,
    /// When the money was spent.
    pub spend_date_time: DateTime<Utc>,
    /// Unsigned amount.
    pub value: Money,
    /// Reviewer username, distinct from the creator's.
    pub reviewer: String,
    /// Free text, possibly empty.
    pub notes: String,
}

/// An authorized transaction carrying its signed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedTransaction {
    /// Direction.
    pub kind: TransactionKind,
    /// When the money was spent.
    pub spend_date_time: DateTime<Utc>,
    /// Signed amount: negative for outgoing funds.
    pub value: Money,
    /// Resolved reviewer.
    pub reviewer_id: UserId,
    /// Free text.
    pub notes: String,
}

impl PricedTransaction {
    /// Applies the sign convention to a validated transaction.
    #[must_use]
    pub fn from_validated(validated: ValidatedTransaction, reviewer_id: UserId) -> Self {
        let value = match validated.kind {
            TransactionKind::In => validated.value,
            TransactionKind::Out => -validated.value,
        };
        Self {
            kind: validated.kind,
            spend_date_time: validated.spend_date_time,
            value,
            reviewer_id,
            notes: validated.notes,
        }
    }
}

/// A wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Wallet ID.
    pub id: WalletId,
    /// Display name.
    pub name: String,
    /// Current balance, never negative.
    pub balance: Money,
    /// Owning organization.
    pub organization_id: OrganizationId,
}

/// Wallet input exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletDraft {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Opening balance; zero when absent.
    #[serde(default)]
    pub balance: Option<String>,
}

/// A wallet about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWallet {
    /// Display name.
    pub name: String,
    /// Opening balance.
    pub balance: Money,
    /// Owning organization.
    pub organization_id: OrganizationId,
}

/// A committed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Transaction ID.
    pub id: TransactionId,
    /// Free text.
    pub notes: String,
    /// Always false at creation.
    pub approved: bool,
    /// When the transaction was recorded.
    pub entry_date_time: DateTime<Utc>,
    /// When the money was spent.
    pub spend_date_time: DateTime<Utc>,
    /// Signed amount: negative for outgoing funds.
    pub transaction_value: Money,
    /// Wallet the transaction belongs to.
    pub wallet_id: WalletId,
    /// Principal who recorded it.
    pub creator_id: UserId,
    /// Principal asked to review it.
    pub reviewer_id: UserId,
}

/// A transaction about to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Free text.
    pub notes: String,
    /// When the transaction was recorded.
    pub entry_date_time: DateTime<Utc>,
    /// When the money was spent.
    pub spend_date_time: DateTime<Utc>,
    /// Signed amount.
    pub transaction_value: Money,
    /// Target wallet.
    pub wallet_id: WalletId,
    /// Recording principal.
    pub creator_id: UserId,
    /// Reviewer.
    pub reviewer_id: UserId,
}

impl NewTransaction {
    /// Builds the row for a priced transaction, stamped with `entry_date_time`.
    #[must_use]
    pub fn from_priced(
        priced: PricedTransaction,
        wallet_id: WalletId,
        creator_id: UserId,
        entry_date_time: DateTime<Utc>,
    ) -> Self {
        Self {
            notes: priced.notes,
            entry_date_time,
            spend_date_time: priced.spend_date_time,
            transaction_value: priced.value,
            wallet_id,
            creator_id,
            reviewer_id: priced.reviewer_id,
        }
    }
}

/// A wallet with its organization name and a page of recent transactions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletOverview {
    /// The wallet.
    pub wallet: Wallet,
    /// Owning organization's name.
    pub organization_name: String,
    /// Newest transactions first.
    pub transactions: PageResponse<TransactionRecord>,
}
