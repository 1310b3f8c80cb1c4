use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | DATABASE_URL | sqlite:tearoom.db | SQLite 数据库 |
/// | DB_MAX_CONNECTIONS | 5 | 连接池大小 |
/// | BUSY_TIMEOUT_MS | 5000 | 写锁等待时间(毫秒) |
/// | LOG_DIR | - | 日志目录 (未设置时只输出到终端) |
/// | ENVIRONMENT | development | 运行环境 |
/// | JWT_SECRET | - | 令牌密钥, 至少 32 字符 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_URL=sqlite:/data/tearoom.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Time a writer waits for the SQLite lock before the request fails with SystemBusy
    pub busy_timeout_ms: u64,
    pub log_dir: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ServerError::Config(format!("{key} has an invalid value: {raw}"))),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的项使用默认值; 设置了但无法解析的项是错误
    pub fn from_env() -> Result<Self> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let db_max_connections: u32 = env_or("DB_MAX_CONNECTIONS", 5)?;
        if db_max_connections == 0 {
            return Err(ServerError::Config("DB_MAX_CONNECTIONS must be at least 1".into()));
        }

        Ok(Self {
            http_port: env_or("HTTP_PORT", 5000)?,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:tearoom.db".into()),
            db_max_connections,
            busy_timeout_ms: env_or("BUSY_TIMEOUT_MS", 5000)?,
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            jwt: JwtConfig::from_env(environment == "development")?,
            environment,
        })
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
