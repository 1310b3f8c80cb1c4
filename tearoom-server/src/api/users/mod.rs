//! User API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// User router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    // 自己的资料; /{id} 允许本人或管理员
    let self_routes = Router::new()
        .route("/me", get(handler::me))
        .route("/{id}", get(handler::get_by_id));

    let admin_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}/activate", post(handler::activate))
        .route("/{id}/deactivate", post(handler::deactivate))
        .layer(middleware::from_fn(require_admin));

    self_routes.merge(admin_routes)
}
