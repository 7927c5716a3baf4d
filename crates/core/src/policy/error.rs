//! Policy engine errors.

use casbin::error::AdapterError;
use thiserror::Error;

use crate::store::StoreError;

/// Errors raised while loading or mutating policies.
///
/// Enforcement itself never fails; a missing grant is simply `false`.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The policy repository failed.
    #[error("policy store error: {0}")]
    Store(#[from] StoreError),

    /// The enforcer rejected the model or a policy row.
    #[error("policy enforcer error: {0}")]
    Enforcer(casbin::Error),

    /// Revoking would leave the role without any holder in its domain.
    #[error("role {role} must keep at least one holder")]
    LastHolder {
        /// Role that would be emptied.
        role: String,
    },
}

impl From<casbin::Error> for PolicyError {
    fn from(err: casbin::Error) -> Self {
        match err {
            casbin::Error::AdapterError(AdapterError(inner)) => match inner.downcast::<StoreError>() {
                Ok(store) => Self::Store(*store),
                Err(other) => Self::Enforcer(casbin::Error::AdapterError(AdapterError(other))),
            },
            other => Self::Enforcer(other),
        }
    }
}
