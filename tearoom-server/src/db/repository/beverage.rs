//! Beverage Repository

use super::{RepoError, RepoResult};
use shared::models::{Beverage, BeverageCreate, BeverageUpdate};
use sqlx::{SqliteExecutor, SqlitePool};

const BEVERAGE_SELECT: &str =
    "SELECT id, name, price, is_active, created_at, updated_at FROM beverages";

pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Beverage>> {
    let sql = format!("{BEVERAGE_SELECT} WHERE is_active = 1 ORDER BY name");
    let beverages = sqlx::query_as::<_, Beverage>(&sql).fetch_all(pool).await?;
    Ok(beverages)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Beverage>> {
    let sql = format!("{BEVERAGE_SELECT} ORDER BY name");
    let beverages = sqlx::query_as::<_, Beverage>(&sql).fetch_all(pool).await?;
    Ok(beverages)
}

pub async fn find_by_id(
    executor: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<Beverage>> {
    let sql = format!("{BEVERAGE_SELECT} WHERE id = ?");
    let beverage = sqlx::query_as::<_, Beverage>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(beverage)
}

pub async fn create(pool: &SqlitePool, data: BeverageCreate) -> RepoResult<Beverage> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO beverages (name, price, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(data.price)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create beverage".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: BeverageUpdate) -> RepoResult<Beverage> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE beverages SET name = COALESCE(?1, name), price = COALESCE(?2, price), is_active = COALESCE(?3, is_active), updated_at = ?4 WHERE id = ?5",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.price)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Beverage {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Beverage {id} not found")))
}

pub async fn toggle_active(pool: &SqlitePool, id: i64) -> RepoResult<Beverage> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE beverages SET is_active = 1 - is_active, updated_at = ?1 WHERE id = ?2",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Beverage {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Beverage {id} not found")))
}

/// Number of order lines (any order status) that reference this beverage
pub async fn count_lines(pool: &SqlitePool, id: i64) -> RepoResult<i64> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM order_drinks WHERE beverage_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

/// Hard delete. Callers check [`count_lines`] first; the foreign key
/// still rejects a delete that races with a new line.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM beverages WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::testing;

    #[tokio::test]
    async fn inactive_beverages_are_hidden_from_active_list() {
        let pool = testing::pool().await;
        let cay = testing::seed_beverage(&pool, "Çay", 5).await;
        let kahve = testing::seed_beverage(&pool, "Kahve", 15).await;

        let toggled = toggle_active(&pool, kahve).await.unwrap();
        assert!(!toggled.is_active);

        let active = find_active(&pool).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, cay);
        assert_eq!(find_all(&pool).await.unwrap().len(), 2);

        let toggled = toggle_active(&pool, kahve).await.unwrap();
        assert!(toggled.is_active);
    }

    #[tokio::test]
    async fn update_keeps_absent_fields() {
        let pool = testing::pool().await;
        let id = testing::seed_beverage(&pool, "Salep", 20).await;

        let updated = update(
            &pool,
            id,
            BeverageUpdate {
                price: Some(25),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Salep");
        assert_eq!(updated.price, 25);
        assert!(updated.is_active);

        let err = update(&pool, 999, BeverageUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn negative_price_violates_schema() {
        let pool = testing::pool().await;
        let err = create(
            &pool,
            BeverageCreate {
                name: "Bozuk".into(),
                price: -1,
                is_active: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_unused_beverage() {
        let pool = testing::pool().await;
        let id = testing::seed_beverage(&pool, "Ayran", 8).await;
        assert_eq!(count_lines(&pool, id).await.unwrap(), 0);
        assert!(delete(&pool, id).await.unwrap());
        assert!(!delete(&pool, id).await.unwrap());
    }
}
