//! Session token generation and validation.
//!
//! Session tokens are HS512-signed JWTs carrying the principal's profile,
//! an issuer, and issued-at/expiration timestamps.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;

use crate::auth::{PrincipalClaims, SessionClaims};
use crate::config::SessionConfig;

/// Errors that can occur during session token operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token was issued by someone else.
    #[error("token issuer is not accepted")]
    WrongIssuer,

    /// Token is malformed or its signature does not match.
    #[error("invalid token")]
    Invalid,
}

/// Session token service.
#[derive(Clone)]
pub struct SessionTokenService {
    issuer: String,
    expires_in: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for SessionTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenService")
            .field("issuer", &self.issuer)
            .field("expires_in", &self.expires_in)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl SessionTokenService {
    /// Creates a new session token service from configuration.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        let expires_in = i64::try_from(config.expiration_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self {
            issuer: config.issuer.clone(),
            expires_in,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Issues a session token with the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn issue(&self, principal: PrincipalClaims) -> Result<String, JwtError> {
        self.issue_with_expiry(principal, self.expires_in)
    }

    /// Issues a session token that expires `expiry` from now.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn issue_with_expiry(
        &self,
        principal: PrincipalClaims,
        expiry: Duration,
    ) -> Result<String, JwtError> {
        let expires_at = Utc::now()
            .checked_add_signed(expiry)
            .ok_or_else(|| JwtError::EncodingError("expiry out of range".to_string()))?;
        let claims = SessionClaims::new(principal, &self.issuer, expires_at);

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Verifies a token's signature, issuer and expiry and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired,
    /// `JwtError::WrongIssuer` if it was issued elsewhere, and
    /// `JwtError::Invalid` for anything malformed or tampered with.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidIssuer => JwtError::WrongIssuer,
                _ => JwtError::Invalid,
            })
    }

    /// Returns the configured token lifetime in seconds.
    #[must_use]
    pub fn expires_in_secs(&self) -> i64 {
        self.expires_in.num_seconds()
    }
}
