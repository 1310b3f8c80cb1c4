//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::OrderLineNotFound
            | Self::BeverageNotFound
            | Self::RoomNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::UsernameExists
            | Self::BeverageInUse
            | Self::RoomInUse => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired | Self::UserInactive => {
                StatusCode::FORBIDDEN
            }

            // 503 Service Unavailable
            Self::SystemBusy => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_rule_failures_are_bad_request() {
        assert_eq!(
            ErrorCode::OrderNotPending.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InsufficientBalance.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::BeverageUnavailable.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::InvalidStatus.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::OrderNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::RoomInUse.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::TokenInvalid.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::AdminRequired.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ErrorCode::SystemBusy.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
