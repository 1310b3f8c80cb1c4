//! Repository Module
//!
//! Free functions over SQLite. Single-statement reads take any
//! [`sqlx::SqliteExecutor`] so they work against the pool or inside a
//! unit of work; writes that belong to an order mutation take the open
//! transaction.

pub mod beverage;
pub mod order;
pub mod order_drink;
pub mod room;
pub mod user;

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

    #[error("Database is busy")]
    Busy,
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if shared::error::is_lock_contention(&err) {
            return RepoError::Busy;
        }
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Row not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err)
                if db_err.is_foreign_key_violation() || db_err.is_check_violation() =>
            {
                RepoError::Validation(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
