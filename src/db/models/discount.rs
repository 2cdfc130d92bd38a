//! Discount Model

use serde::{Deserialize, Serialize};

/// Discount type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum DiscountType {
    /// `value` is a percentage of the line subtotal (e.g. 10 = 10%)
    Percentage,
    /// `value` is a flat amount, capped at the line subtotal
    Fixed,
    /// Every second unit is free; `value` is unused
    Buy1Take1,
}

impl DiscountType {
    pub fn as_str(self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
            DiscountType::Buy1Take1 => "buy1take1",
        }
    }
}

/// Discount entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Discount {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub discount_type: DiscountType,
    /// Meaning depends on `discount_type`; always >= 0
    pub value: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,

    /// Eligible menu item IDs (junction table, populated by application code)
    #[sqlx(skip)]
    #[serde(default)]
    pub menu_item_ids: Vec<i64>,
}

/// Create discount payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountCreate {
    pub name: String,
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    pub value: f64,
    pub is_active: Option<bool>,
    /// Eligible menu items to attach
    #[serde(default)]
    pub menu_item_ids: Vec<i64>,
}

/// Update discount payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiscountUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub discount_type: Option<DiscountType>,
    pub value: Option<f64>,
    pub is_active: Option<bool>,
    /// Replace-all eligible set; None leaves it untouched
    pub menu_item_ids: Option<Vec<i64>>,
}
