//! User Model

use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User entity with its ticket balance
///
/// `ticket_count` is never written directly by user endpoints once the
/// account exists; only order operations move it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub ticket_count: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create user payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub full_name: Option<String>,
    pub role: Option<Role>,
    /// Opening ticket balance, defaults to 0
    pub ticket_count: Option<i64>,
}
