//! Order, order item and status-history models

use serde::{Deserialize, Serialize};
use shared::{OrderStatus, PaymentMethod};

/// الطلب
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub vendor_id: i64,
    /// Set only when the order enters `delivering` or later
    pub driver_id: Option<i64>,
    /// Σ line items (quantity × unit_price)
    pub subtotal: f64,
    pub delivery_fee: f64,
    /// Invariant: subtotal + delivery_fee
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: i64,
}

/// سطر الطلب
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit_price: f64,
}

/// Append-only transition log entry. The first entry per order is the
/// `pending` creation record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StatusHistoryEntry {
    pub id: i64,
    pub order_id: i64,
    pub status: OrderStatus,
    pub note: String,
    pub actor_id: Option<i64>,
    pub created_at: i64,
}

/// Full order view: order + items + timeline
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub history: Vec<StatusHistoryEntry>,
}

/// Input for creating an order
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub customer_id: i64,
    pub vendor_id: i64,
    pub delivery_fee: f64,
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderItemCreate>,
}

/// Input line item
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemCreate {
    pub product_id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit_price: f64,
}
