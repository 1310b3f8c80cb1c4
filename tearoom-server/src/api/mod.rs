//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单接口
//! - [`order_drinks`] - 订单行接口
//! - [`beverages`] - 饮品目录
//! - [`rooms`] - 房间管理
//! - [`users`] - 用户管理

pub mod beverages;
pub mod health;
pub mod order_drinks;
pub mod orders;
pub mod rooms;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
