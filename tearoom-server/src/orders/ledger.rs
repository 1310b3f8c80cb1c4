//! Ticket ledger
//!
//! The only code that moves a user's ticket balance. Both entry points
//! run inside the caller's transaction, so a movement commits or rolls
//! back together with the order change that caused it.

use tracing::debug;

use super::error::{OrderError, OrderResult};
use crate::db::repository::user as user_repo;

/// Cost of `quantity` units at `unit_price`
pub fn line_cost(quantity: i64, unit_price: i64) -> OrderResult<i64> {
    quantity
        .checked_mul(unit_price)
        .ok_or_else(|| OrderError::InvalidArgument("line cost is out of range".into()))
}

/// Take `amount` tickets from `user_id`. Fails with `InsufficientBalance`
/// (balance untouched) when the balance does not cover it.
pub async fn debit(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    user_id: i64,
    amount: i64,
    now: i64,
) -> OrderResult<i64> {
    if amount < 0 {
        return Err(OrderError::InvalidArgument(format!(
            "debit amount must not be negative, got {amount}"
        )));
    }

    if let Some(balance) = user_repo::try_debit(tx, user_id, amount, now).await? {
        debug!(user_id, amount, balance, "Tickets debited");
        return Ok(balance);
    }

    let available = user_repo::ticket_count(&mut **tx, user_id)
        .await?
        .ok_or(OrderError::UserNotFound(user_id))?;
    debug!(user_id, required = amount, available, "Debit refused");
    Err(OrderError::InsufficientBalance {
        required: amount,
        available,
    })
}

/// Give `amount` tickets back to `user_id`. Refunds are never capped.
pub async fn credit(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    user_id: i64,
    amount: i64,
    now: i64,
) -> OrderResult<i64> {
    if amount < 0 {
        return Err(OrderError::InvalidArgument(format!(
            "credit amount must not be negative, got {amount}"
        )));
    }

    let balance = user_repo::credit(tx, user_id, amount, now)
        .await?
        .ok_or(OrderError::UserNotFound(user_id))?;
    debug!(user_id, amount, balance, "Tickets credited");
    Ok(balance)
}
