//! Password hashing with Argon2id.
//!
//! Stored hashes use the `derivedKey:salt` encoding, both halves hex. Every
//! password gets a fresh random 16-byte salt.

use argon2::{
    Argon2,
    password_hash::{
        Output,
        rand_core::{OsRng, RngCore},
    },
};
use thiserror::Error;

const KEY_LEN: usize = 32;
const SALT_LEN: usize = 16;
const MIN_SALT_LEN: usize = 8;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Invalid password hash format.
    #[error("invalid password hash format")]
    InvalidHash,
}

fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; KEY_LEN], PasswordError> {
    let mut key = [0u8; KEY_LEN];
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;
    Ok(key)
}

/// Hashes a password using Argon2id with a freshly generated salt.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use coffer_core::auth::hash_password;
///
/// let hash = hash_password("my_secure_password").unwrap();
/// let (key, salt) = hash.split_once(':').unwrap();
/// assert_eq!(key.len(), 64);
/// assert_eq!(salt.len(), 32);
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let key = derive_key(password, &salt)?;
    Ok(format!("{}:{}", hex::encode(key), hex::encode(salt)))
}

/// Verifies a password against a stored `derivedKey:salt` hash.
///
/// The derived keys are compared in constant time.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash is malformed.
///
/// # Example
///
/// ```
/// use coffer_core::auth::{hash_password, verify_password};
///
/// let hash = hash_password("my_password").unwrap();
/// assert!(verify_password("my_password", &hash).unwrap());
/// assert!(!verify_password("wrong_password", &hash).unwrap());
/// ```
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let (key_hex, salt_hex) = stored.split_once(':').ok_or(PasswordError::InvalidHash)?;
    let expected = hex::decode(key_hex).map_err(|_| PasswordError::InvalidHash)?;
    let salt = hex::decode(salt_hex).map_err(|_| PasswordError::InvalidHash)?;
    if expected.len() != KEY_LEN || salt.len() < MIN_SALT_LEN {
        return Err(PasswordError::InvalidHash);
    }

    let actual = derive_key(password, &salt)?;

    let expected = Output::new(&expected).map_err(|_| PasswordError::InvalidHash)?;
    let actual = Output::new(&actual).map_err(|_| PasswordError::InvalidHash)?;
    Ok(expected == actual)
}

/// Runs [`hash_password`] on the blocking thread pool.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails or the worker panics.
pub async fn hash_password_async(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::HashError(e.to_string()))?
}

/// Runs [`verify_password`] on the blocking thread pool.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash is malformed.
pub async fn verify_password_async(password: String, stored: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| PasswordError::HashError(e.to_string()))?
}
