//! Workflow error types for wallets and transactions.
//!
//! Field-level failures carry the wire name of the offending field so the
//! boundary can return them as a `field -> message` map.

use thiserror::Error;

use coffer_shared::error::FieldErrors;

use crate::accounts::AccountError;
use crate::authorization::AuthorizationError;
use crate::store::StoreError;

/// Shown on `transactionValue` when an outgoing transaction exceeds the balance.
pub const INSUFFICIENT_BALANCE_MESSAGE: &str =
    "The wallet does not have enough balance for this transaction.";

/// Shown on `transactionValue` when an incoming transaction would push the
/// balance past the storable maximum.
pub const BALANCE_LIMIT_MESSAGE: &str = "The wallet balance cannot exceed 99999999999999999.99.";

/// Shown on `reviewer` when the reviewer cannot approve in the organization.
pub const REVIEWER_NOT_AUTHORIZED_MESSAGE: &str =
    "User is not authorized to review your transaction";

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Input failed validation.
    #[error("Invalid input")]
    Validation(FieldErrors),

    /// The caller lacks the required role.
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    /// Wallet not found in the organization.
    #[error("Wallet not found")]
    WalletNotFound,

    /// Organization not found.
    #[error("Organization not found")]
    OrganizationNotFound,

    /// Outgoing value exceeds the wallet balance.
    #[error("The wallet does not have enough balance for this transaction.")]
    InsufficientBalance,

    /// Incoming value would push the balance past the storable maximum.
    #[error("The wallet balance cannot exceed 99999999999999999.99.")]
    BalanceLimit,

    /// The reviewer does not hold `allowApproveTransactions` in the
    /// wallet's organization.
    #[error("User is not authorized to review your transaction")]
    ReviewerNotAuthorized,

    /// Principal lookup failed.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Repository failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::InsufficientBalance
            | Self::BalanceLimit
            | Self::ReviewerNotAuthorized => 400,
            Self::Unauthorized(_) => 403,
            Self::WalletNotFound | Self::OrganizationNotFound => 404,
            Self::Account(err) => err.status_code(),
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized(err) => err.error_code(),
            Self::WalletNotFound => "WALLET_NOT_FOUND",
            Self::OrganizationNotFound => "ORGANIZATION_NOT_FOUND",
            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Self::BalanceLimit => "BALANCE_LIMIT",
            Self::ReviewerNotAuthorized => "REVIEWER_NOT_AUTHORIZED",
            Self::Account(err) => err.error_code(),
            Self::Store(_) => "STORAGE_ERROR",
        }
    }

    /// Field errors to show the caller, if this error is field-level.
    #[must_use]
    pub fn field_errors(&self) -> Option<FieldErrors> {
        let single = |field: &str, message: &str| {
            FieldErrors::from([(field.to_string(), message.to_string())])
        };
        match self {
            Self::Validation(errors) => Some(errors.clone()),
            Self::InsufficientBalance => {
                Some(single("transactionValue", INSUFFICIENT_BALANCE_MESSAGE))
            }
            Self::BalanceLimit => Some(single("transactionValue", BALANCE_LIMIT_MESSAGE)),
            Self::ReviewerNotAuthorized => {
                Some(single("reviewer", REVIEWER_NOT_AUTHORIZED_MESSAGE))
            }
            _ => None,
        }
    }
}
