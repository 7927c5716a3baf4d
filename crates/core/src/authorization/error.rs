//! Authorization errors.

use thiserror::Error;

use crate::authorization::capability::Capability;

/// Errors raised by the authorization gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// The principal holds no role in the organization.
    #[error("Not a member of this organization")]
    NotMember,

    /// The principal's role does not satisfy the predicate.
    #[error("Forbidden")]
    Denied,

    /// The principal's role lacks a named capability.
    #[error("Missing capability {0}")]
    MissingCapability(Capability),
}

impl AuthorizationError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        403
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotMember => "NOT_A_MEMBER",
            Self::Denied | Self::MissingCapability(_) => "FORBIDDEN",
        }
    }
}
