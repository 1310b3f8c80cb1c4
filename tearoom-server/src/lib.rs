//! Tearoom Server - 茶水间订单与票据服务
//!
//! # 架构概述
//!
//! Users spend prepaid tickets on drink orders; admins approve or reject
//! them. Every order mutation moves the owner's ticket balance inside the
//! same SQLite transaction.
//!
//! # 模块结构
//!
//! ```text
//! tearoom-server/src/
//! ├── core/          # 配置、状态、路由与服务器
//! ├── auth/          # JWT 校验、访问策略
//! ├── orders/        # 票据账本、订单行、订单状态机
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 错误、日志、输入校验
//! └── db/            # SQLite 连接池与仓储
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, build_router};
pub use orders::OrderService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:ident, $event:expr) => {
        tracing::info!(target: "security", level = stringify!($level), event = $event)
    };
    ($level:ident, $event:expr, $($arg:tt)*) => {
        tracing::info!(
            target: "security",
            level = stringify!($level),
            event = $event,
            $($arg)*
        )
    };
}

/// Load `.env` and start logging. Call once before reading [`Config`].
pub fn setup_environment() {
    let _ = dotenvy::dotenv();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty());
    init_logger_with_file(log_dir.as_deref());
}
