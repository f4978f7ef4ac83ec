//! Repository Module
//!
//! Free functions over `&SqlitePool` (reads) or `&mut SqliteConnection`
//! (writes that must share a transaction). Query text lives here and nowhere
//! else.

pub mod category;
pub mod menu_item;
pub mod order;
pub mod stats;
pub mod user;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::invalid_request(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Decimal -> minor units, or a validation error naming the field
pub(crate) fn minor_units(amount: rust_decimal::Decimal, field: &str) -> RepoResult<i64> {
    crate::orders::money::to_minor(amount)
        .ok_or_else(|| RepoError::Validation(format!("{field} out of range: {amount}")))
}
