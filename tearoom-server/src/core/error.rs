use thiserror::Error;

use crate::auth::JwtError;
use crate::utils::AppError;

/// Startup and serving failures. Request-level errors are [`AppError`].
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error("数据库初始化失败: {0}")]
    Database(#[from] AppError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 服务器的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
