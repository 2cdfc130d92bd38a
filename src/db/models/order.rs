//! Order Model

use super::discount::DiscountType;
use serde::{Deserialize, Serialize};

/// Order status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Legal transitions: pending may complete or cancel; re-applying the
    /// current status is an idempotent no-op.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self == next
            || matches!(
                (self, next),
                (OrderStatus::Pending, OrderStatus::Completed)
                    | (OrderStatus::Pending, OrderStatus::Cancelled)
            )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order header. Totals are always derived from the owned line items.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub employee_id: i64,
    pub table_number: String,
    pub status: OrderStatus,
    pub subtotal: f64,
    pub total_discount: f64,
    /// Invariant: `total_amount == subtotal - total_discount`
    pub total_amount: f64,
    pub created_at: i64,
    pub updated_at: i64,

    /// Line items (populated by application code, skipped by FromRow)
    #[sqlx(skip)]
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Order line item — immutable snapshot of the menu item and discount at
/// order time. Later catalog or discount edits never alter these rows.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub item_name: String,
    pub unit_price: f64,
    pub quantity: i64,
    /// `unit_price * quantity`
    pub subtotal: f64,
    pub discount_id: Option<i64>,
    pub discount_name: Option<String>,
    pub discount_type: Option<DiscountType>,
    /// Invariant: `0 <= discount_amount <= subtotal`
    pub discount_amount: f64,
    /// `subtotal - discount_amount`
    pub total_amount: f64,
    pub created_at: i64,
}

/// One requested line of a new order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub menu_item_id: i64,
    pub quantity: i64,
    pub discount_id: Option<i64>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub employee_id: i64,
    pub table_number: String,
    pub items: Vec<OrderLineInput>,
}

/// Header patch for an existing order. Never touches line items or
/// re-resolves discounts.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderUpdate {
    pub employee_id: Option<i64>,
    pub table_number: Option<String>,
}

/// Optional filters for order listing
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub employee_id: Option<i64>,
    pub table_number: Option<String>,
    /// created_at lower bound (Unix millis, inclusive)
    pub created_from: Option<i64>,
    /// created_at upper bound (Unix millis, inclusive)
    pub created_to: Option<i64>,
}

/// Aggregate order statistics for a time range
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderStats {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub completed_orders: i64,
    pub cancelled_orders: i64,
    /// Sum of completed orders' total_amount
    pub total_sales: f64,
    /// Sum of completed orders' total_discount
    pub total_discounts: f64,
}
