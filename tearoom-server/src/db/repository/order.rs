//! Order Repository

use super::RepoResult;
use shared::models::{Order, OrderStatus, OrderSummary};
use sqlx::{SqliteExecutor, SqlitePool};

const SUMMARY_SELECT: &str = "SELECT o.id, o.user_id, u.username, o.room_id, r.name AS room_name, o.notes, o.status, o.created_at, o.updated_at FROM orders o JOIN users u ON u.id = o.user_id JOIN rooms r ON r.id = o.room_id";

pub async fn find_by_id(executor: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "SELECT id, user_id, room_id, notes, status, created_at, updated_at FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(order)
}

pub async fn find_summary(
    executor: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<OrderSummary>> {
    let sql = format!("{SUMMARY_SELECT} WHERE o.id = ?");
    let order = sqlx::query_as::<_, OrderSummary>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(order)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<OrderSummary>> {
    let sql = format!("{SUMMARY_SELECT} ORDER BY o.created_at DESC, o.id DESC");
    let orders = sqlx::query_as::<_, OrderSummary>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(orders)
}

pub async fn find_by_status(
    pool: &SqlitePool,
    status: OrderStatus,
) -> RepoResult<Vec<OrderSummary>> {
    let sql = format!("{SUMMARY_SELECT} WHERE o.status = ? ORDER BY o.created_at, o.id");
    let orders = sqlx::query_as::<_, OrderSummary>(&sql)
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(orders)
}

/// Approved and rejected orders, most recently finalized first
pub async fn find_completed(pool: &SqlitePool) -> RepoResult<Vec<OrderSummary>> {
    let sql = format!(
        "{SUMMARY_SELECT} WHERE o.status <> 'Pending' ORDER BY o.updated_at DESC, o.id DESC"
    );
    let orders = sqlx::query_as::<_, OrderSummary>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(orders)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<OrderSummary>> {
    let sql = format!("{SUMMARY_SELECT} WHERE o.user_id = ? ORDER BY o.created_at DESC, o.id DESC");
    let orders = sqlx::query_as::<_, OrderSummary>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(orders)
}

// ── Unit-of-work writes ──────────────────────────────────────────────

/// Take the write lock on the order row. Returns false when it does not exist.
pub async fn touch(tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>, id: i64, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE orders SET updated_at = ?1 WHERE id = ?2")
        .bind(now)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Take the write lock on the order that owns `line_id`. Returns false
/// when the line does not exist.
pub async fn touch_by_line(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    line_id: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET updated_at = ?1 WHERE id = (SELECT order_id FROM order_drinks WHERE id = ?2)",
    )
    .bind(now)
    .bind(line_id)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Take the write lock for a bulk operation over pending orders
pub async fn touch_pending(tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE orders SET updated_at = ?1 WHERE status = 'Pending'")
        .bind(now)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn insert(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    user_id: i64,
    room_id: i64,
    notes: Option<&str>,
    now: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (user_id, room_id, notes, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5) RETURNING id",
    )
    .bind(user_id)
    .bind(room_id)
    .bind(notes)
    .bind(OrderStatus::Pending)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;
    Ok(id)
}

/// `notes`: `None` keeps the current value, `Some(None)` clears it.
pub async fn update_details(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    id: i64,
    notes: Option<Option<&str>>,
    room_id: Option<i64>,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE orders SET notes = CASE WHEN ?1 THEN ?2 ELSE notes END, room_id = COALESCE(?3, room_id), updated_at = ?4 WHERE id = ?5",
    )
    .bind(notes.is_some())
    .bind(notes.flatten())
    .bind(room_id)
    .bind(now)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn set_status(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    id: i64,
    status: OrderStatus,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Delete an order and its lines
pub async fn delete(tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>, id: i64) -> RepoResult<bool> {
    sqlx::query("DELETE FROM order_drinks WHERE order_id = ?")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Current cost of pending lines, grouped by order owner
pub async fn pending_cost_by_owner(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
) -> RepoResult<Vec<(i64, i64)>> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        "SELECT o.user_id, COALESCE(SUM(d.quantity * b.price), 0) FROM orders o JOIN order_drinks d ON d.order_id = o.id JOIN beverages b ON b.id = d.beverage_id WHERE o.status = 'Pending' GROUP BY o.user_id ORDER BY o.user_id",
    )
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows)
}

/// Delete every order and line. Returns the number of orders removed.
pub async fn delete_all(tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>) -> RepoResult<u64> {
    sqlx::query("DELETE FROM order_drinks")
        .execute(&mut **tx)
        .await?;
    let rows = sqlx::query("DELETE FROM orders").execute(&mut **tx).await?;
    Ok(rows.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::testing;
    use shared::models::Role;

    #[tokio::test]
    async fn insert_and_list_by_status() {
        let pool = testing::pool().await;
        let user = testing::seed_user(&pool, "zeynep", Role::User, 0).await;
        let room = testing::seed_room(&pool, "Toplantı Odası").await;

        let mut tx = pool.begin().await.unwrap();
        let first = insert(&mut tx, user, room, Some("şekersiz"), 10).await.unwrap();
        let second = insert(&mut tx, user, room, None, 20).await.unwrap();
        set_status(&mut tx, second, OrderStatus::Approved, 30)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let pending = find_by_status(&pool, OrderStatus::Pending).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, first);
        assert_eq!(pending[0].username, "zeynep");
        assert_eq!(pending[0].room_name, "Toplantı Odası");
        assert_eq!(pending[0].notes.as_deref(), Some("şekersiz"));

        let completed = find_completed(&pool).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].status, OrderStatus::Approved);

        assert_eq!(find_by_user(&pool, user).await.unwrap().len(), 2);
        assert_eq!(find_all(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn touch_reports_missing_rows() {
        let pool = testing::pool().await;
        let mut tx = pool.begin().await.unwrap();
        assert!(!touch(&mut tx, 1, 1).await.unwrap());
        assert!(!touch_by_line(&mut tx, 1, 1).await.unwrap());
        assert_eq!(touch_pending(&mut tx, 1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_details_keeps_absent_fields() {
        let pool = testing::pool().await;
        let user = testing::seed_user(&pool, "can", Role::User, 0).await;
        let room_a = testing::seed_room(&pool, "A").await;
        let room_b = testing::seed_room(&pool, "B").await;

        let mut tx = pool.begin().await.unwrap();
        let id = insert(&mut tx, user, room_a, Some("az şekerli"), 1).await.unwrap();
        update_details(&mut tx, id, None, Some(room_b), 2).await.unwrap();
        tx.commit().await.unwrap();

        let order = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(order.room_id, room_b);
        assert_eq!(order.notes.as_deref(), Some("az şekerli"));
        assert_eq!(order.updated_at, 2);
    }

    #[tokio::test]
    async fn update_details_sets_and_clears_notes() {
        let pool = testing::pool().await;
        let user = testing::seed_user(&pool, "nur", Role::User, 0).await;
        let room = testing::seed_room(&pool, "A").await;

        let mut tx = pool.begin().await.unwrap();
        let id = insert(&mut tx, user, room, None, 1).await.unwrap();
        update_details(&mut tx, id, Some(Some("limonlu")), None, 2).await.unwrap();
        tx.commit().await.unwrap();
        let order = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(order.notes.as_deref(), Some("limonlu"));

        let mut tx = pool.begin().await.unwrap();
        update_details(&mut tx, id, Some(None), None, 3).await.unwrap();
        tx.commit().await.unwrap();
        let order = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(order.notes, None);
        assert_eq!(order.room_id, room);
    }
}
