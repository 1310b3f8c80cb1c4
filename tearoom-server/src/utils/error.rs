//! 统一错误处理
//!
//! Re-exports the shared error system and maps repository failures onto it.
//! Raw `sqlx::Error` converts through `shared` (feature `db`).
//!
//! | RepoError | ErrorCode | HTTP |
//! |-----------|-----------|------|
//! | NotFound | NotFound | 404 |
//! | Duplicate | AlreadyExists | 409 |
//! | Validation | ValidationFailed | 400 |
//! | Busy | SystemBusy | 503 |
//! | Database | DatabaseError | 500 |

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Busy => {
                tracing::warn!("Database busy, request rejected for retry");
                AppError::busy()
            }
            RepoError::Database(msg) => {
                // 不向客户端暴露数据库细节
                tracing::error!(error = %msg, "Database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn repo_errors_map_to_codes() {
        let err: AppError = RepoError::NotFound("Room 3 not found".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Room 3 not found");

        let err: AppError = RepoError::Duplicate("users.username".into()).into();
        assert_eq!(err.http_status(), StatusCode::CONFLICT);

        let err: AppError = RepoError::Busy.into();
        assert_eq!(err.http_status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn database_errors_hide_details() {
        let err: AppError = RepoError::Database("disk I/O error at page 7".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, ErrorCode::DatabaseError.message());
        assert!(err.details.is_none());
    }

    #[test]
    fn raw_sqlx_errors_reach_the_same_codes() {
        assert!(matches!(RepoError::from(sqlx::Error::PoolTimedOut), RepoError::Busy));

        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.code, ErrorCode::SystemBusy);

        let err: AppError = RepoError::from(sqlx::Error::RowNotFound).into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
