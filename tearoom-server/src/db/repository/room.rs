//! Room Repository

use super::{RepoError, RepoResult};
use shared::models::{Room, RoomCreate, RoomUpdate};
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Room>> {
    let rooms = sqlx::query_as::<_, Room>(
        "SELECT id, name, created_at, updated_at FROM rooms ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rooms)
}

pub async fn find_by_id(executor: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Room>> {
    let room = sqlx::query_as::<_, Room>(
        "SELECT id, name, created_at, updated_at FROM rooms WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(room)
}

pub async fn create(pool: &SqlitePool, data: RoomCreate) -> RepoResult<Room> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO rooms (name, created_at, updated_at) VALUES (?1, ?2, ?2) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create room".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: RoomUpdate) -> RepoResult<Room> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE rooms SET name = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(data.name.trim())
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Room {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Room {id} not found")))
}

pub async fn count_orders(pool: &SqlitePool, id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE room_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM rooms WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
