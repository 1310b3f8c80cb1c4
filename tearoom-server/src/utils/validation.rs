//! Input validation helpers
//!
//! Text length limits and the positive-quantity rule shared by handlers
//! and the order core. SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: beverage, room, username
pub const MAX_NAME_LEN: usize = 100;

/// Order notes
pub const MAX_NOTE_LEN: usize = 500;

/// Upper bound for a single line quantity
pub const MAX_QUANTITY: i64 = 1_000;

/// Upper bound for a beverage price in tickets.
///
/// With [`MAX_QUANTITY`] a line costs at most 10^9, so line and order
/// totals computed in SQL stay far from i64 overflow.
pub const MAX_PRICE: i64 = 1_000_000;

/// Upper bound for a user's opening ticket balance
pub const MAX_TICKETS: i64 = 1_000_000_000;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")).with_detail("field", field));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a line quantity: a positive whole number of units.
pub fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {quantity}"
        ))
        .with_detail("field", "quantity"));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity is too large ({quantity}, max {MAX_QUANTITY})"
        ))
        .with_detail("field", "quantity"));
    }
    Ok(())
}

/// Validate a ticket amount (beverage price, opening balance): `0..=max`.
pub fn validate_amount(value: i64, field: &str, max: i64) -> Result<(), AppError> {
    if value < 0 {
        return Err(
            AppError::validation(format!("{field} must not be negative")).with_detail("field", field),
        );
    }
    if value > max {
        return Err(AppError::validation(format!(
            "{field} is too large ({value}, max {max})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}
