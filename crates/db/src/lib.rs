//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository implementations of the `coffer-core` store traits
//! - Database migrations

pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;

pub use migration::Migrator;
pub use repositories::{
    OrganizationRepository, PolicyRepository, UserRepository, WalletRepository,
};

use std::sync::Arc;

use coffer_core::Stores;
use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Builds the core store bundle backed by `db`.
#[must_use]
pub fn stores(db: &DatabaseConnection) -> Stores {
    Stores {
        principals: Arc::new(UserRepository::new(db.clone())),
        organizations: Arc::new(OrganizationRepository::new(db.clone())),
        wallets: Arc::new(WalletRepository::new(db.clone())),
        policies: Arc::new(PolicyRepository::new(db.clone())),
    }
}
