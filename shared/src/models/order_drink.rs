//! Order Line (OrderDrink) Model

use serde::{Deserialize, Serialize};

/// One beverage + quantity entry within an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderDrink {
    pub id: i64,
    pub order_id: i64,
    pub beverage_id: i64,
    pub quantity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Line joined with its beverage, priced at the current beverage price
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderDrinkDetail {
    pub id: i64,
    pub order_id: i64,
    pub beverage_id: i64,
    pub beverage_name: String,
    pub unit_price: i64,
    pub quantity: i64,
    pub line_cost: i64,
}

/// Add line payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDrinkCreate {
    pub order_id: i64,
    pub beverage_id: i64,
    pub quantity: i64,
}

/// Update line payload; absent fields keep the current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderDrinkUpdate {
    pub beverage_id: Option<i64>,
    pub quantity: Option<i64>,
}

/// Add/update line response: the line and the owner's balance afterwards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineChanged {
    pub line: OrderDrinkDetail,
    pub ticket_count: i64,
}

/// Delete line response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRemoved {
    pub id: i64,
    pub refunded: i64,
    pub ticket_count: i64,
}
