//! Order Line API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{LineChanged, LineRemoved, OrderDrinkCreate, OrderDrinkDetail, OrderDrinkUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

/// Every line (admin)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderDrinkDetail>>> {
    Ok(Json(state.orders.list_lines().await?))
}

pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderDrinkCreate>,
) -> AppResult<(StatusCode, Json<LineChanged>)> {
    let added = state.orders.add_line(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDrinkDetail>> {
    Ok(Json(state.orders.get_line(&user, id).await?))
}

pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderDrinkUpdate>,
) -> AppResult<Json<LineChanged>> {
    Ok(Json(state.orders.update_line(&user, id, payload).await?))
}

pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<LineRemoved>> {
    Ok(Json(state.orders.delete_line(&user, id).await?))
}

pub async fn by_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<i64>,
) -> AppResult<Json<Vec<OrderDrinkDetail>>> {
    Ok(Json(state.orders.lines_by_order(&user, order_id).await?))
}
