//! Beverage API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Beverage router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/beverages", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：活跃饮品对所有登录用户可见
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/with-inactive", get(handler::list_with_inactive))
        .route("/{id}", get(handler::get_by_id));

    // 管理路由：仅管理员可用
    let manage_routes = Router::new()
        .route("/all", get(handler::list_all))
        .route("/", axum::routing::post(handler::create))
        .route("/{id}", axum::routing::put(handler::update).delete(handler::delete))
        .route("/{id}/toggle-active", patch(handler::toggle_active))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
