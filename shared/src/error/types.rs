//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Every failure that reaches a client is one of these: a stable
/// [`ErrorCode`], a human-readable message and optional structured
/// details (e.g. `required`/`available` for a failed debit).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn admin_required() -> Self {
        Self::new(ErrorCode::AdminRequired)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn busy() -> Self {
        Self::new(ErrorCode::SystemBusy)
    }
}

/// Error response body
///
/// - `code`: numeric [`ErrorCode`]
/// - `message`: human-readable message
/// - `details`: structured context, omitted when empty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::error(&self);

        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::NotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::new(ErrorCode::InsufficientBalance)
            .with_detail("required", 60)
            .with_detail("available", 20);

        let details = err.details.unwrap();
        assert_eq!(details.get("required"), Some(&Value::from(60)));
        assert_eq!(details.get("available"), Some(&Value::from(20)));
    }

    #[test]
    fn test_app_error_http_status() {
        assert_eq!(
            AppError::validation("bad").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_authenticated().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::admin_required().http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::busy().http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::RoomNotFound, "Room 7 not found");
        assert_eq!(err.to_string(), "Room 7 not found");
    }

    #[test]
    fn test_api_response_from_error() {
        let err = AppError::new(ErrorCode::OrderNotPending).with_detail("order_id", 3);
        let resp = ApiResponse::error(&err);
        assert_eq!(resp.code, 4002);
        assert!(resp.details.is_some());
    }

    #[test]
    fn test_api_response_serialize_skips_empty_fields() {
        let json = serde_json::to_value(ApiResponse::error(&AppError::busy())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": 9004, "message": "System is busy, please retry" })
        );
    }
}
