//! Credential handling.
//!
//! This module provides:
//! - Password hashing with Argon2id and a per-password random salt
//! - Constant-time password verification
//! - Async wrappers that keep hashing off the request threads

mod password;

pub use password::{
    PasswordError, hash_password, hash_password_async, verify_password, verify_password_async,
};
