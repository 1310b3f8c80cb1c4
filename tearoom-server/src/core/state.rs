use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::orders::OrderService;

/// 服务器状态 - 持有所有服务的共享引用
///
/// Cloned into every handler; all fields are cheap handles.
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | jwt_service | 令牌校验 |
/// | orders | 订单与票据核心 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub orders: OrderService,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            orders: OrderService::new(pool.clone()),
            config: Arc::new(config),
            pool,
            jwt_service,
        }
    }

    /// Open the database (applying migrations) and build the state
    pub async fn initialize(config: Config) -> Result<Self> {
        let db = DbService::new(&config).await?;
        Ok(Self::new(config, db.pool))
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
