//! Order Line Repository
//!
//! Line costs are always computed from the beverage's current price.

use super::RepoResult;
use shared::models::{OrderDrink, OrderDrinkDetail};
use sqlx::{SqliteExecutor, SqlitePool};

const DETAIL_SELECT: &str = "SELECT d.id, d.order_id, d.beverage_id, b.name AS beverage_name, b.price AS unit_price, d.quantity, d.quantity * b.price AS line_cost FROM order_drinks d JOIN beverages b ON b.id = d.beverage_id";

pub async fn find_by_id(
    executor: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<OrderDrink>> {
    let line = sqlx::query_as::<_, OrderDrink>(
        "SELECT id, order_id, beverage_id, quantity, created_at, updated_at FROM order_drinks WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(line)
}

pub async fn find_detail(
    executor: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<OrderDrinkDetail>> {
    let sql = format!("{DETAIL_SELECT} WHERE d.id = ?");
    let line = sqlx::query_as::<_, OrderDrinkDetail>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(line)
}

pub async fn find_by_order(
    executor: impl SqliteExecutor<'_>,
    order_id: i64,
) -> RepoResult<Vec<OrderDrinkDetail>> {
    let sql = format!("{DETAIL_SELECT} WHERE d.order_id = ? ORDER BY d.id");
    let lines = sqlx::query_as::<_, OrderDrinkDetail>(&sql)
        .bind(order_id)
        .fetch_all(executor)
        .await?;
    Ok(lines)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<OrderDrinkDetail>> {
    let sql = format!("{DETAIL_SELECT} ORDER BY d.order_id, d.id");
    let lines = sqlx::query_as::<_, OrderDrinkDetail>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(lines)
}

/// Sum of `quantity * current price` over the order's lines
pub async fn order_cost(executor: impl SqliteExecutor<'_>, order_id: i64) -> RepoResult<i64> {
    let cost = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(d.quantity * b.price), 0) FROM order_drinks d JOIN beverages b ON b.id = d.beverage_id WHERE d.order_id = ?",
    )
    .bind(order_id)
    .fetch_one(executor)
    .await?;
    Ok(cost)
}

// ── Unit-of-work writes ──────────────────────────────────────────────

pub async fn insert(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    order_id: i64,
    beverage_id: i64,
    quantity: i64,
    now: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO order_drinks (order_id, beverage_id, quantity, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) RETURNING id",
    )
    .bind(order_id)
    .bind(beverage_id)
    .bind(quantity)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;
    Ok(id)
}

pub async fn update(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    id: i64,
    beverage_id: i64,
    quantity: i64,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE order_drinks SET beverage_id = ?1, quantity = ?2, updated_at = ?3 WHERE id = ?4",
    )
    .bind(beverage_id)
    .bind(quantity)
    .bind(now)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn delete(tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM order_drinks WHERE id = ?")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() > 0)
}
