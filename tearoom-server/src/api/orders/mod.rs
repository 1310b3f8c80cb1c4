//! Order API Module
//!
//! All mutations go through [`crate::orders::OrderService`].

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    // 用户路由：所有权由 OrderService 中的访问策略检查
    let user_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route("/my-orders", get(handler::my_orders))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::patch)
                .patch(handler::patch)
                .delete(handler::delete),
        );

    // 管理路由：仅管理员可用
    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route("/pending", get(handler::pending))
        .route("/completed", get(handler::completed))
        .route("/all", delete(handler::delete_all))
        .layer(middleware::from_fn(require_admin));

    user_routes.merge(admin_routes)
}
