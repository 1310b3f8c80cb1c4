//! sqlx error mapping (feature `db`)
//!
//! | sqlx::Error | ErrorCode |
//! |-------------|-----------|
//! | RowNotFound | NotFound |
//! | PoolTimedOut, SQLITE_BUSY, SQLITE_LOCKED | SystemBusy |
//! | unique violation | AlreadyExists |
//! | foreign key / check violation | ValidationFailed |
//! | anything else | DatabaseError |

use super::codes::ErrorCode;
use super::types::AppError;

/// SQLite primary result codes that mean "another writer holds the lock"
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// The lock could not be acquired within the busy timeout
pub fn is_lock_contention(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Database(db_err) => {
            // Extended result codes keep the primary code in the low byte
            let primary = db_err
                .code()
                .and_then(|c| c.parse::<i32>().ok())
                .map(|c| c & 0xff);
            matches!(primary, Some(SQLITE_BUSY) | Some(SQLITE_LOCKED))
        }
        _ => false,
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if is_lock_contention(&err) {
            tracing::warn!("Database busy, request rejected for retry");
            return AppError::busy();
        }
        match &err {
            sqlx::Error::RowNotFound => AppError::new(ErrorCode::NotFound),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::conflict(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err)
                if db_err.is_foreign_key_violation() || db_err.is_check_violation() =>
            {
                AppError::validation(db_err.message().to_string())
            }
            _ => {
                // 不向客户端暴露数据库细节
                tracing::error!(error = %err, "Database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}
