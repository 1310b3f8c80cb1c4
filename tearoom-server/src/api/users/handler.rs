//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{User, UserCreate};

use crate::auth::{CurrentUser, policy};
use crate::core::ServerState;
use crate::db::repository::{RepoError, user};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_TICKETS, validate_amount, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::UserNotFound, format!("User {id} not found"))
        .with_detail("user_id", id)
}

fn username_taken(username: &str) -> AppError {
    AppError::with_message(
        ErrorCode::UsernameExists,
        format!("Username '{username}' is already taken"),
    )
}

/// All users (admin)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(user::find_all(state.pool()).await?))
}

/// The requester's profile, including the current ticket balance
pub async fn me(State(state): State<ServerState>, current: CurrentUser) -> AppResult<Json<User>> {
    user::find_by_id(state.pool(), current.id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(current.id))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    policy::authorize(&current, id, "user", id)?;
    user::find_by_id(state.pool(), id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// Register a user with an opening ticket balance (admin)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<User>)> {
    validate_required_text(&payload.username, "username", MAX_NAME_LEN)?;
    validate_optional_text(payload.full_name.as_deref(), "full_name", MAX_NAME_LEN)?;
    if let Some(tickets) = payload.ticket_count {
        validate_amount(tickets, "ticket_count", MAX_TICKETS)?;
    }

    let username = payload.username.trim().to_string();
    if user::find_by_username(state.pool(), &username).await?.is_some() {
        return Err(username_taken(&username));
    }

    let created = user::create(state.pool(), payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => username_taken(&username),
            other => other.into(),
        })?;
    tracing::info!(
        user_id = created.id,
        username = %created.username,
        role = %created.role,
        balance = created.ticket_count,
        "User registered"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn activate(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<User>> {
    set_active(&state, id, true).await
}

pub async fn deactivate(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<User>> {
    set_active(&state, id, false).await
}

async fn set_active(state: &ServerState, id: i64, active: bool) -> AppResult<Json<User>> {
    let updated = user::set_active(state.pool(), id, active)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;
    tracing::info!(user_id = id, is_active = active, "User activation changed");
    Ok(Json(updated))
}
