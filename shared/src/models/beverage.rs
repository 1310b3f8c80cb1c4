//! Beverage Model

use serde::{Deserialize, Serialize};

/// Beverage entity (çay, kahve, ...)
///
/// `price` is in tickets per unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Beverage {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Menu entry including inactive beverages, flagged by whether they can be ordered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeverageListing {
    #[serde(flatten)]
    pub beverage: Beverage,
    pub can_order: bool,
}

impl From<Beverage> for BeverageListing {
    fn from(beverage: Beverage) -> Self {
        Self {
            can_order: beverage.is_active,
            beverage,
        }
    }
}

/// Create beverage payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeverageCreate {
    pub name: String,
    pub price: i64,
    pub is_active: Option<bool>,
}

/// Update beverage payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BeverageUpdate {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub is_active: Option<bool>,
}
