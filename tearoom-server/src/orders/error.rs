use shared::models::OrderStatus;
use thiserror::Error;

use crate::auth::AccessDenied;
use crate::db::repository::RepoError;
use crate::utils::{AppError, ErrorCode};

/// Business-rule failures of the order core
///
/// Every variant is detected before the unit of work commits, so a
/// failure leaves orders, lines and balances untouched.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{field} {id} does not exist")]
    UnknownReference { field: &'static str, id: i64 },

    #[error("Order {0} not found")]
    OrderNotFound(i64),

    #[error("Order line {0} not found")]
    LineNotFound(i64),

    #[error("User {0} not found")]
    UserNotFound(i64),

    #[error("User {0} is inactive")]
    UserInactive(i64),

    #[error(transparent)]
    Access(#[from] AccessDenied),

    #[error("Order {order_id} is {status}; only pending orders can be changed")]
    NotPending { order_id: i64, status: OrderStatus },

    #[error("Beverage {0} is not available")]
    BeverageUnavailable(i64),

    #[error("Insufficient ticket balance: need {required}, have {available}")]
    InsufficientBalance { required: i64, available: i64 },

    #[error("Invalid status '{0}', expected Approved or Rejected")]
    InvalidStatus(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Repo(err.into())
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::InvalidArgument(_) => AppError::validation(message),
            OrderError::UnknownReference { field, id } => {
                AppError::validation(message).with_detail(field, id)
            }
            OrderError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, message).with_detail("order_id", id)
            }
            OrderError::LineNotFound(id) => {
                AppError::with_message(ErrorCode::OrderLineNotFound, message).with_detail("line_id", id)
            }
            OrderError::UserNotFound(id) => {
                AppError::with_message(ErrorCode::UserNotFound, message).with_detail("user_id", id)
            }
            OrderError::UserInactive(id) => {
                AppError::with_message(ErrorCode::UserInactive, message).with_detail("user_id", id)
            }
            OrderError::Access(denied) => denied.into(),
            OrderError::NotPending { order_id, status } => {
                AppError::with_message(ErrorCode::OrderNotPending, message)
                    .with_detail("order_id", order_id)
                    .with_detail("status", status.as_str())
            }
            OrderError::BeverageUnavailable(id) => {
                AppError::with_message(ErrorCode::BeverageUnavailable, message)
                    .with_detail("beverage_id", id)
            }
            OrderError::InsufficientBalance {
                required,
                available,
            } => AppError::with_message(ErrorCode::InsufficientBalance, message)
                .with_detail("required", required)
                .with_detail("available", available),
            OrderError::InvalidStatus(status) => {
                AppError::with_message(ErrorCode::InvalidStatus, message).with_detail("status", status)
            }
            OrderError::Repo(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn insufficient_balance_carries_amounts() {
        let err: AppError = OrderError::InsufficientBalance {
            required: 60,
            available: 40,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientBalance);
        assert_eq!(err.message, "Insufficient ticket balance: need 60, have 40");
        let details = err.details.unwrap();
        assert_eq!(details["required"], Value::from(60));
        assert_eq!(details["available"], Value::from(40));
    }

    #[test]
    fn not_pending_reports_status() {
        let err: AppError = OrderError::NotPending {
            order_id: 4,
            status: OrderStatus::Rejected,
        }
        .into();
        assert_eq!(err.code, ErrorCode::OrderNotPending);
        assert_eq!(err.details.unwrap()["status"], Value::from("Rejected"));
    }

    #[test]
    fn unknown_reference_is_a_validation_error() {
        let err: AppError = OrderError::UnknownReference {
            field: "room_id",
            id: 12,
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "room_id 12 does not exist");
        assert_eq!(err.details.unwrap()["room_id"], Value::from(12));
    }
}
