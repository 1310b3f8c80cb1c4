//! Unified error system
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Error response body
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::InsufficientBalance)
//!     .with_detail("required", 60)
//!     .with_detail("available", 20);
//!
//! let response = ApiResponse::error(&err);
//! assert_eq!(response.code, 5001);
//! ```

mod category;
mod codes;
#[cfg(feature = "db")]
mod db;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
#[cfg(feature = "db")]
pub use db::is_lock_contention;
