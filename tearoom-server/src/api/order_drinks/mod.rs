//! Order Line API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Order line router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orderdrinks", routes())
}

fn routes() -> Router<ServerState> {
    let user_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .patch(handler::update)
                .delete(handler::delete),
        )
        .route("/by-order/{order_id}", get(handler::by_order));

    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .layer(middleware::from_fn(require_admin));

    user_routes.merge(admin_routes)
}
