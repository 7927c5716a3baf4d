//! Organization errors.

use thiserror::Error;

use coffer_shared::error::FieldErrors;

use crate::authorization::AuthorizationError;
use crate::policy::PolicyError;
use crate::store::StoreError;

/// Errors raised by organization management.
#[derive(Debug, Error)]
pub enum OrganizationError {
    /// Input failed validation.
    #[error("Invalid organization data")]
    Validation(FieldErrors),

    /// The caller lacks the required role.
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    /// Organization not found.
    #[error("Organization not found")]
    NotFound,

    /// The target principal does not exist.
    #[error("User not found")]
    UserNotFound,

    /// The role name is not a built-in role.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Removing the role would leave the organization without an owner.
    #[error("Organization must keep at least one owner")]
    LastOwner,

    /// Policy repository failure.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// Repository failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OrganizationError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::UnknownRole(_) | Self::LastOwner => 400,
            Self::Unauthorized(_) => 403,
            Self::NotFound | Self::UserNotFound => 404,
            Self::Policy(_) | Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized(err) => err.error_code(),
            Self::NotFound => "ORGANIZATION_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::UnknownRole(_) => "UNKNOWN_ROLE",
            Self::LastOwner => "LAST_OWNER",
            Self::Policy(_) => "POLICY_ERROR",
            Self::Store(_) => "STORAGE_ERROR",
        }
    }
}
