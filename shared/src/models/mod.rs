//! Data models for the tea-room service
//!
//! IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod beverage;
pub mod order;
pub mod order_drink;
pub mod room;
pub mod user;

pub use beverage::*;
pub use order::*;
pub use order_drink::*;
pub use room::*;
pub use user::*;
