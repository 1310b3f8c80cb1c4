//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{
    OrderCreate, OrderCreated, OrderDetail, OrderPatch, OrderSummary, OrdersCleared, PendingOrders,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

/// List every order (admin)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderSummary>>> {
    Ok(Json(state.orders.list_orders().await?))
}

/// Place an order for the requester, debiting its lines
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<OrderCreated>)> {
    let created = state.orders.create_order(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn pending(State(state): State<ServerState>) -> AppResult<Json<PendingOrders>> {
    Ok(Json(state.orders.pending_orders().await?))
}

pub async fn completed(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderSummary>>> {
    Ok(Json(state.orders.completed_orders().await?))
}

pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderDetail>>> {
    Ok(Json(state.orders.my_orders(&user).await?))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    Ok(Json(state.orders.get_order(&user, id).await?))
}

/// `PUT` and `PATCH`: notes / room (owner or admin), status (admin)
pub async fn patch(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderPatch>,
) -> AppResult<Json<OrderDetail>> {
    Ok(Json(state.orders.patch_order(&user, id, payload).await?))
}

pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.orders.delete_order(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove every order, refunding pending ones (admin)
pub async fn delete_all(State(state): State<ServerState>) -> AppResult<Json<OrdersCleared>> {
    Ok(Json(state.orders.delete_all().await?))
}
