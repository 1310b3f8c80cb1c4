//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/health | GET | 服务与数据库状态 | 无 |

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use crate::core::ServerState;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    version: &'static str,
    /// ok | unavailable
    database: &'static str,
}

async fn health(State(state): State<ServerState>) -> Response {
    let database = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(state.pool())
        .await;

    match database {
        Ok(_) => Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            database: "ok",
        })
        .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check: database unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    version: env!("CARGO_PKG_VERSION"),
                    database: "unavailable",
                }),
            )
                .into_response()
        }
    }
}
