//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌校验
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] / [`require_admin`] - 中间件
//! - [`policy`] - owner-or-admin access policy

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod policy;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use policy::AccessDenied;
