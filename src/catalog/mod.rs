//! Catalog
//!
//! Menu item lifecycle plus bundle composition. Bundle planning is a
//! pure function; the service wraps it with persistence and a
//! transaction so an item and its components change together.

pub mod bundle;
pub mod service;

pub use bundle::plan_components;
pub use service::{
    archive_menu_item, create_menu_item, restore_menu_item, toggle_menu_item, update_menu_item,
};
