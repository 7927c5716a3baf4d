//! Account errors.

use thiserror::Error;

use coffer_shared::error::FieldErrors;

use crate::auth::PasswordError;
use crate::store::StoreError;

/// Errors raised by registration, login and principal lookups.
#[derive(Debug, Error)]
pub enum AccountError {
    /// One or more fields failed validation.
    #[error("Invalid registration data")]
    Validation(FieldErrors),

    /// The email is already registered.
    #[error("User already exists with this email")]
    EmailTaken,

    /// The username is already registered.
    #[error("User already exists with this username")]
    UsernameTaken,

    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Principal not found.
    #[error("User not found")]
    NotFound,

    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Repository failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AccountError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::InvalidCredentials => 401,
            Self::NotFound => 404,
            Self::EmailTaken | Self::UsernameTaken => 409,
            Self::Password(_) | Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotFound => "USER_NOT_FOUND",
            Self::Password(_) => "PASSWORD_ERROR",
            Self::Store(_) => "STORAGE_ERROR",
        }
    }
}
