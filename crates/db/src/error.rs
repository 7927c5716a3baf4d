//! Mapping from `SeaORM` errors to the core store error.

use coffer_core::store::StoreError;
use sea_orm::{DbErr, SqlErr};

/// Converts a database error, surfacing unique violations as conflicts.
#[allow(clippy::needless_pass_by_value)]
pub fn store_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
        _ => {
            tracing::error!(error = %err, "database error");
            StoreError::Backend(err.to_string())
        }
    }
}
