//! Core business logic for Coffer.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence goes through the repository traits in [`store`].
//!
//! # Modules
//!
//! - `auth` - Password hashing and verification
//! - `policy` - Domain-scoped RBAC policy engine
//! - `authorization` - Organization roles and the capability gate
//! - `accounts` - Principal registration, login and search
//! - `organization` - Organizations and role management
//! - `workflow` - Wallets and the transaction creation pipeline
//! - `store` - Repository traits and the in-memory repository
//! - `context` - The process-scoped service context

pub mod accounts;
pub mod auth;
pub mod authorization;
pub mod context;
pub mod organization;
pub mod policy;
pub mod store;
pub mod workflow;

pub use context::{CoreContext, Stores};
