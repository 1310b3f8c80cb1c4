//! Room API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Room, RoomCreate, RoomUpdate};

use crate::core::ServerState;
use crate::db::repository::{RepoError, room};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::RoomNotFound, format!("Room {id} not found"))
        .with_detail("room_id", id)
}

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Room>>> {
    Ok(Json(room::find_all(state.pool()).await?))
}

pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<Room>> {
    room::find_by_id(state.pool(), id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RoomCreate>,
) -> AppResult<(StatusCode, Json<Room>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let created = room::create(state.pool(), payload).await?;
    tracing::info!(room_id = created.id, name = %created.name, "Room created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RoomUpdate>,
) -> AppResult<Json<Room>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let updated = room::update(state.pool(), id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;
    Ok(Json(updated))
}

/// Rooms referenced by any order cannot be deleted
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    let orders = room::count_orders(state.pool(), id).await?;
    if orders > 0 {
        return Err(AppError::with_message(
            ErrorCode::RoomInUse,
            format!("Room {id} is used by {orders} orders"),
        )
        .with_detail("room_id", id));
    }

    if !room::delete(state.pool(), id).await? {
        return Err(not_found(id));
    }
    tracing::info!(room_id = id, "Room deleted");
    Ok(StatusCode::NO_CONTENT)
}
