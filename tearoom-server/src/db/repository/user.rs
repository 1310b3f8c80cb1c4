//! User Repository
//!
//! The ticket balance columns are only written through [`try_debit`] and
//! [`credit`]; both are called from the ticket ledger inside an order
//! unit of work.

use super::{RepoError, RepoResult};
use shared::models::{Role, User, UserCreate};
use sqlx::{SqliteExecutor, SqlitePool};

const USER_SELECT: &str = "SELECT id, username, full_name, role, ticket_count, is_active, created_at, updated_at FROM users";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY username");
    let users = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(users)
}

pub async fn find_by_id(executor: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ? LIMIT 1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let role = data.role.unwrap_or(Role::User);
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, full_name, role, ticket_count, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5) RETURNING id",
    )
    .bind(data.username.trim())
    .bind(data.full_name)
    .bind(role)
    .bind(data.ticket_count.unwrap_or(0))
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn set_active(pool: &SqlitePool, id: i64, active: bool) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE users SET is_active = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(active)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

/// Take the write lock on behalf of `id` without changing anything
/// observable. Returns false when the user does not exist.
pub async fn touch(tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>, id: i64, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE users SET updated_at = ?1 WHERE id = ?2")
        .bind(now)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Guarded debit: subtracts `amount` only when the balance covers it.
///
/// Returns the new balance, or `None` when the user is missing or the
/// balance is too low (the row is left untouched in both cases).
pub async fn try_debit(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    id: i64,
    amount: i64,
    now: i64,
) -> RepoResult<Option<i64>> {
    let balance = sqlx::query_scalar::<_, i64>(
        "UPDATE users SET ticket_count = ticket_count - ?1, updated_at = ?2 WHERE id = ?3 AND ticket_count >= ?1 RETURNING ticket_count",
    )
    .bind(amount)
    .bind(now)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(balance)
}

/// Unconditional credit. Returns the new balance, `None` if the user is missing.
pub async fn credit(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    id: i64,
    amount: i64,
    now: i64,
) -> RepoResult<Option<i64>> {
    let balance = sqlx::query_scalar::<_, i64>(
        "UPDATE users SET ticket_count = ticket_count + ?1, updated_at = ?2 WHERE id = ?3 RETURNING ticket_count",
    )
    .bind(amount)
    .bind(now)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(balance)
}

pub async fn ticket_count(executor: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<i64>> {
    let balance = sqlx::query_scalar::<_, i64>("SELECT ticket_count FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(balance)
}
