//! Principal records.

use serde::Serialize;

use coffer_shared::auth::PrincipalClaims;
use coffer_shared::types::UserId;

/// A registered user.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    /// Principal ID.
    pub id: UserId,
    /// Unique username.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// `derivedKey:salt` password hash.
    pub password_hash: String,
}

impl std::fmt::Debug for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password_hash", &"[hidden]")
            .finish()
    }
}

impl Principal {
    /// Profile claims embedded in a session token.
    #[must_use]
    pub fn claims(&self) -> PrincipalClaims {
        PrincipalClaims {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }

    /// Public view without credentials.
    #[must_use]
    pub fn summary(&self) -> PrincipalSummary {
        PrincipalSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// Principal as returned to other users (search results, reviewers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalSummary {
    /// Principal ID.
    pub id: UserId,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
}

/// A principal about to be inserted.
#[derive(Clone)]
pub struct NewPrincipal {
    /// Unique username.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Already hashed password.
    pub password_hash: String,
}

impl std::fmt::Debug for NewPrincipal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewPrincipal")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
