//! Room Model

use serde::{Deserialize, Serialize};

/// Room entity: a delivery destination for orders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create room payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCreate {
    pub name: String,
}

/// Update room payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomUpdate {
    pub name: String,
}
