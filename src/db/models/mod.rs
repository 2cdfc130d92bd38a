//! Data models
//!
//! Entity structs derive `sqlx::FromRow`; Create/Update payloads are plain
//! serde structs. All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all
//! timestamps Unix millis. Money fields are `f64` at this boundary and
//! `Decimal` inside the pricing code.

pub mod category;
pub mod discount;
pub mod employee;
pub mod menu_item;
pub mod order;

// Re-exports
pub use category::*;
pub use discount::*;
pub use employee::*;
pub use menu_item::*;
pub use order::*;
