//! Repository error type.

use thiserror::Error;

/// Errors returned by repository implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The referenced record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A conditional balance update found too little money in the wallet.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// The backing store failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}
