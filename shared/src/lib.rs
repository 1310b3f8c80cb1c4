//! Shared types for the tea-room service
//!
//! Error codes, the unified API response envelope and the entity models
//! exchanged between the server and its clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
