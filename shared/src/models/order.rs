//! Order Model

use super::order_drink::OrderDrinkDetail;
use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// `Pending` is the only mutable state; `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Approved => "Approved",
            OrderStatus::Rejected => "Rejected",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Parse a client-supplied status value (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "approved" => Some(OrderStatus::Approved),
            "rejected" => Some(OrderStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub room_id: i64,
    pub notes: Option<String>,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order joined with owner and room names (for list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub room_id: i64,
    pub room_name: String,
    pub notes: Option<String>,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: OrderSummary,
    pub lines: Vec<OrderDrinkDetail>,
    /// Current cost of all lines at today's prices
    pub total_cost: i64,
}

/// One requested line in an order create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub beverage_id: i64,
    pub quantity: i64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub room_id: i64,
    pub notes: Option<String>,
    #[serde(default)]
    pub lines: Vec<OrderLineInput>,
}

/// Patch order payload
///
/// `status` stays a raw string so that unknown values surface as
/// `InvalidStatus` instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPatch {
    pub notes: Option<String>,
    pub room_id: Option<i64>,
    pub status: Option<String>,
}

/// Create order response: the order and the owner's balance after debits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order: OrderDetail,
    pub ticket_count: i64,
}

/// Pending orders listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingOrders {
    pub orders: Vec<OrderSummary>,
    pub count: usize,
}

/// Result of the admin delete-all
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersCleared {
    pub deleted: u64,
    pub refunded: i64,
}
