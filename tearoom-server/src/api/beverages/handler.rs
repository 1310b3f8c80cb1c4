//! Beverage API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Beverage, BeverageCreate, BeverageListing, BeverageUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, beverage};
use crate::utils::validation::{MAX_NAME_LEN, MAX_PRICE, validate_amount, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::BeverageNotFound, format!("Beverage {id} not found"))
        .with_detail("beverage_id", id)
}

fn map_missing(id: i64) -> impl FnOnce(RepoError) -> AppError {
    move |e| match e {
        RepoError::NotFound(_) => not_found(id),
        other => other.into(),
    }
}

/// Active beverages (the menu)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Beverage>>> {
    Ok(Json(beverage::find_active(state.pool()).await?))
}

/// Every beverage with a `can_order` flag, so clients can grey out inactive ones
pub async fn list_with_inactive(State(state): State<ServerState>) -> AppResult<Json<Vec<BeverageListing>>> {
    let beverages = beverage::find_all(state.pool()).await?;
    Ok(Json(beverages.into_iter().map(BeverageListing::from).collect()))
}

/// All beverages including inactive ones (admin)
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<Beverage>>> {
    Ok(Json(beverage::find_all(state.pool()).await?))
}

/// Inactive beverages are only visible to admins
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Beverage>> {
    match beverage::find_by_id(state.pool(), id).await? {
        Some(b) if b.is_active || user.is_admin() => Ok(Json(b)),
        _ => Err(not_found(id)),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BeverageCreate>,
) -> AppResult<(StatusCode, Json<Beverage>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_amount(payload.price, "price", MAX_PRICE)?;

    let created = beverage::create(state.pool(), payload).await?;
    tracing::info!(beverage_id = created.id, name = %created.name, price = created.price, "Beverage created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<BeverageUpdate>,
) -> AppResult<Json<Beverage>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(price) = payload.price {
        validate_amount(price, "price", MAX_PRICE)?;
    }

    let updated = beverage::update(state.pool(), id, payload)
        .await
        .map_err(map_missing(id))?;
    tracing::info!(beverage_id = id, price = updated.price, is_active = updated.is_active, "Beverage updated");
    Ok(Json(updated))
}

pub async fn toggle_active(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Beverage>> {
    let toggled = beverage::toggle_active(state.pool(), id)
        .await
        .map_err(map_missing(id))?;
    tracing::info!(beverage_id = id, is_active = toggled.is_active, "Beverage availability toggled");
    Ok(Json(toggled))
}

/// Referenced beverages cannot be deleted; deactivate them instead
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    let in_use = beverage::count_lines(state.pool(), id).await?;
    if in_use > 0 {
        return Err(AppError::with_message(
            ErrorCode::BeverageInUse,
            format!("Beverage {id} is used by {in_use} order lines"),
        )
        .with_detail("beverage_id", id));
    }

    if !beverage::delete(state.pool(), id).await? {
        return Err(not_found(id));
    }
    tracing::info!(beverage_id = id, "Beverage deleted");
    Ok(StatusCode::NO_CONTENT)
}
