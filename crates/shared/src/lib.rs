//! Shared types, errors, and configuration for Coffer.
//!
//! This crate provides common types used across all other crates:
//! - Money amounts with fixed two-decimal precision
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Session claims and signed session tokens
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;


pub use auth::SessionClaims;
pub use config::{AppConfig, SessionConfig};
pub use error::{AppError, AppResult, FieldErrors};
pub use jwt::{JwtError, SessionTokenService};
