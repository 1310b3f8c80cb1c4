//! Unified error codes for the tea-room service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Ticket errors
//! - 6xxx: Beverage errors
//! - 7xxx: Room errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a bare u16 so clients can switch on the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order is no longer pending
    OrderNotPending = 4002,
    /// Requested status is not a valid transition
    InvalidStatus = 4003,
    /// Order line not found
    OrderLineNotFound = 4004,

    // ==================== 5xxx: Ticket ====================
    /// Ticket balance too low for the debit
    InsufficientBalance = 5001,

    // ==================== 6xxx: Beverage ====================
    /// Beverage not found
    BeverageNotFound = 6001,
    /// Beverage missing or inactive
    BeverageUnavailable = 6002,
    /// Beverage is referenced by order lines
    BeverageInUse = 6003,

    // ==================== 7xxx: Room ====================
    /// Room not found
    RoomNotFound = 7001,
    /// Room is referenced by orders
    RoomInUse = 7002,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// Username already taken
    UsernameExists = 8002,
    /// User account is deactivated
    UserInactive = 8003,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
    /// Store is busy, retry later
    SystemBusy = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin role required",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderNotPending => "Order is no longer pending",
            ErrorCode::InvalidStatus => "Invalid order status",
            ErrorCode::OrderLineNotFound => "Order line not found",

            // Ticket
            ErrorCode::InsufficientBalance => "Insufficient ticket balance",

            // Beverage
            ErrorCode::BeverageNotFound => "Beverage not found",
            ErrorCode::BeverageUnavailable => "Beverage is not available",
            ErrorCode::BeverageInUse => "Beverage is used by existing order lines",

            // Room
            ErrorCode::RoomNotFound => "Room not found",
            ErrorCode::RoomInUse => "Room is used by existing orders",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::UserInactive => "User account is inactive",

            // System
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::SystemBusy => "System is busy, please retry",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderNotPending),
            4003 => Ok(ErrorCode::InvalidStatus),
            4004 => Ok(ErrorCode::OrderLineNotFound),

            // Ticket
            5001 => Ok(ErrorCode::InsufficientBalance),

            // Beverage
            6001 => Ok(ErrorCode::BeverageNotFound),
            6002 => Ok(ErrorCode::BeverageUnavailable),
            6003 => Ok(ErrorCode::BeverageInUse),

            // Room
            7001 => Ok(ErrorCode::RoomNotFound),
            7002 => Ok(ErrorCode::RoomInUse),

            // User
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UsernameExists),
            8003 => Ok(ErrorCode::UserInactive),

            // System
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);
        assert_eq!(ErrorCode::OrderNotPending.code(), 4002);
        assert_eq!(ErrorCode::InsufficientBalance.code(), 5001);
        assert_eq!(ErrorCode::BeverageUnavailable.code(), 6002);
        assert_eq!(ErrorCode::RoomInUse.code(), 7002);
        assert_eq!(ErrorCode::UserInactive.code(), 8003);
        assert_eq!(ErrorCode::SystemBusy.code(), 9004);
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let all = [
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::AlreadyExists,
            ErrorCode::NotAuthenticated,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::PermissionDenied,
            ErrorCode::AdminRequired,
            ErrorCode::OrderNotFound,
            ErrorCode::OrderNotPending,
            ErrorCode::InvalidStatus,
            ErrorCode::OrderLineNotFound,
            ErrorCode::InsufficientBalance,
            ErrorCode::BeverageNotFound,
            ErrorCode::BeverageUnavailable,
            ErrorCode::BeverageInUse,
            ErrorCode::RoomNotFound,
            ErrorCode::RoomInUse,
            ErrorCode::UserNotFound,
            ErrorCode::UsernameExists,
            ErrorCode::UserInactive,
            ErrorCode::DatabaseError,
            ErrorCode::SystemBusy,
        ];
        for code in all {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(3001), Err(InvalidErrorCode(3001)));
        assert_eq!(ErrorCode::try_from(65535), Err(InvalidErrorCode(65535)));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::InsufficientBalance).unwrap();
        assert_eq!(json, "5001");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::OrderNotPending);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("12345");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::ValidationFailed.to_string(), "2");
        assert_eq!(ErrorCode::RoomNotFound.to_string(), "7001");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(
            ErrorCode::InsufficientBalance.message(),
            "Insufficient ticket balance"
        );
    }
}
