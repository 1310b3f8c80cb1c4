//! Server Implementation
//!
//! Router assembly and the HTTP listener

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{CurrentUser, require_auth};
use crate::core::{Config, Result, ServerState};

/// `x-request-id` generator
#[derive(Clone, Copy, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        http::HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// HTTP 请求日志中间件
///
/// Runs inside authentication, so the acting user is known; rejected
/// tokens are recorded on the `security` target instead.
async fn log_request(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .map(|u| u.username.clone())
        .unwrap_or_else(|| "-".into());

    let response = next.run(request).await;

    tracing::info!(
        target: "http_access",
        %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        user = %user,
        "request"
    );
    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::order_drinks::router())
        .merge(crate::api::beverages::router())
        .merge(crate::api::rooms::router())
        .merge(crate::api::users::router())
}

/// The full service: routes, authentication and the tower-http stack
pub fn build_router(state: ServerState) -> Router {
    build_app()
        .layer(middleware::from_fn(log_request))
        // require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Open the database and prepare the state
    pub async fn new(config: Config) -> Result<Self> {
        let state = ServerState::initialize(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, environment = %self.config.environment, "Tearoom server listening");

        axum::serve(listener, build_router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}
