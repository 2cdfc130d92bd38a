//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu item entity
///
/// `available` is the single stored availability flag. The legacy
/// `status` column was kept mechanically equal to `available`; it
/// survives only as the [`MenuItem::status`] alias and as an input
/// alias on the update payload.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    /// Unit price, 2 decimal places
    pub price: f64,
    pub category_id: Option<i64>,
    pub available: bool,
    pub is_bundle: bool,
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    /// Soft-delete marker; archived items keep their history
    pub deleted_at: Option<i64>,

    // -- Relations (populated by application code, skipped by FromRow) --

    /// Bundle components (empty unless `is_bundle`)
    #[sqlx(skip)]
    #[serde(default)]
    pub components: Vec<BundleComponent>,
}

impl MenuItem {
    /// Legacy alias, always equal to `available`
    pub fn status(&self) -> bool {
        self.available
    }
}

/// One bundle component row joined with its menu item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BundleComponent {
    pub component_id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// Component entry as submitted by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInput {
    pub menu_item_id: i64,
    pub quantity: i64,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: f64,
    pub category_id: Option<i64>,
    pub available: Option<bool>,
    /// Legacy alias for `available`; wins when both are supplied
    pub status: Option<bool>,
    pub is_bundle: Option<bool>,
    pub image: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentInput>,
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<i64>,
    pub available: Option<bool>,
    /// Legacy alias for `available`; wins when both are supplied
    pub status: Option<bool>,
    pub is_bundle: Option<bool>,
    pub image: Option<String>,
    /// Replace-all component set; None leaves components untouched
    pub components: Option<Vec<ComponentInput>>,
}

impl MenuItemUpdate {
    /// Effective availability change, honoring the legacy `status` alias
    pub fn effective_available(&self) -> Option<bool> {
        self.status.or(self.available)
    }
}
