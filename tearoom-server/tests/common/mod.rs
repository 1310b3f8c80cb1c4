//! Shared harness: the full router over an in-memory database

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::{BeverageCreate, Role, RoomCreate, UserCreate};
use sqlx::SqlitePool;
use tearoom_server::auth::JwtConfig;
use tearoom_server::db::DbService;
use tearoom_server::db::repository::{beverage, room, user};
use tearoom_server::{Config, ServerState, build_router};
use tower::ServiceExt;

pub fn config(database_url: &str) -> Config {
    Config {
        http_port: 0,
        database_url: database_url.into(),
        db_max_connections: 8,
        busy_timeout_ms: 5_000,
        log_dir: None,
        environment: "test".into(),
        jwt: JwtConfig {
            secret: "integration-test-secret-0123456789abcdef".into(),
            expiration_minutes: 60,
            issuer: "tearoom-identity".into(),
            audience: "tearoom-clients".into(),
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: ServerState,
}

pub async fn app() -> TestApp {
    let db = DbService::in_memory().await.unwrap();
    let state = ServerState::new(config("sqlite::memory:"), db.pool);
    TestApp {
        router: build_router(state.clone()),
        state,
    }
}

impl TestApp {
    pub fn pool(&self) -> &SqlitePool {
        self.state.pool()
    }

    /// Register a user and mint a bearer token for them
    pub async fn user(&self, username: &str, role: Role, tickets: i64) -> (i64, String) {
        let created = user::create(
            self.pool(),
            UserCreate {
                username: username.into(),
                full_name: None,
                role: Some(role),
                ticket_count: Some(tickets),
            },
        )
        .await
        .unwrap();
        let token = self
            .state
            .jwt_service()
            .generate_token(created.id, username, role)
            .unwrap();
        (created.id, token)
    }

    pub async fn beverage(&self, name: &str, price: i64) -> i64 {
        beverage::create(
            self.pool(),
            BeverageCreate {
                name: name.into(),
                price,
                is_active: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    pub async fn room(&self, name: &str) -> i64 {
        room::create(self.pool(), RoomCreate { name: name.into() })
            .await
            .unwrap()
            .id
    }

    pub async fn balance(&self, user_id: i64) -> i64 {
        user::ticket_count(self.pool(), user_id).await.unwrap().unwrap()
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, Some(token), None).await
    }
}
