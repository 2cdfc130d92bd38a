//! Catalog Service
//!
//! Orchestrates menu item writes. Anything touching both the item row
//! and its component rows runs in one transaction so a failed
//! composition never leaves a half-written bundle behind.

use crate::catalog::bundle::plan_components;
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::{self, RepoError};
use crate::utils::{AppError, AppResult, now_millis};
use sqlx::SqlitePool;
use tracing::info;

/// Create a menu item, with components when it is a bundle.
pub async fn create_menu_item(pool: &SqlitePool, data: MenuItemCreate) -> AppResult<MenuItem> {
    if data.name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be empty".to_string()));
    }
    if !data.price.is_finite() || data.price < 0.0 {
        return Err(AppError::Validation(
            "Price must be a non-negative number".to_string(),
        ));
    }

    let is_bundle = data.is_bundle.unwrap_or(false);
    if !is_bundle && !data.components.is_empty() {
        return Err(AppError::InvalidComposition(
            "Only bundle items can have components".to_string(),
        ));
    }

    if let Some(category_id) = data.category_id
        && repository::category::get(pool, category_id).await?.is_none()
    {
        return Err(AppError::NotFound(format!(
            "Category {category_id} not found"
        )));
    }

    // The status alias wins over available when both are supplied
    let available = data.status.or(data.available).unwrap_or(true);
    let plan = plan_components(0, &data.components)?;

    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let now = now_millis();
    let id = repository::menu_item::insert(&mut *tx, &data, available, is_bundle, now).await?;

    if is_bundle && !plan.is_empty() {
        // Re-plan against the real id so a component pointing at the new
        // bundle itself is caught
        let plan = plan_components(id, &data.components)?;
        repository::menu_item::replace_components(&mut *tx, id, &plan).await?;
    }
    tx.commit().await.map_err(RepoError::from)?;

    info!(id, name = %data.name, is_bundle, "menu item created");
    fetch(pool, id).await
}

/// Update a menu item. `components: Some([])` detaches everything;
/// `None` leaves the component set untouched.
pub async fn update_menu_item(
    pool: &SqlitePool,
    id: i64,
    data: MenuItemUpdate,
) -> AppResult<MenuItem> {
    let existing = repository::menu_item::get(pool, id)
        .await?
        .filter(|item| item.deleted_at.is_none())
        .ok_or_else(|| AppError::NotFound(format!("Menu item {id} not found")))?;

    if let Some(price) = data.price
        && (!price.is_finite() || price < 0.0)
    {
        return Err(AppError::Validation(
            "Price must be a non-negative number".to_string(),
        ));
    }
    if let Some(category_id) = data.category_id
        && repository::category::get(pool, category_id).await?.is_none()
    {
        return Err(AppError::NotFound(format!(
            "Category {category_id} not found"
        )));
    }

    let will_be_bundle = data.is_bundle.unwrap_or(existing.is_bundle);
    let has_components = data
        .components
        .as_ref()
        .map(|c| !c.is_empty())
        .unwrap_or(false);
    if has_components && !will_be_bundle {
        return Err(AppError::InvalidComposition(
            "Only bundle items can have components".to_string(),
        ));
    }

    let available = data.effective_available();

    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let now = now_millis();
    repository::menu_item::update_fields(&mut *tx, id, &data, available, now).await?;

    if !will_be_bundle {
        // Demoting to a plain item drops any existing components
        repository::menu_item::detach_components(&mut *tx, id).await?;
    } else if let Some(ref components) = data.components {
        let plan = plan_components(id, components)?;
        repository::menu_item::replace_components(&mut *tx, id, &plan).await?;
    }
    tx.commit().await.map_err(RepoError::from)?;

    info!(id, "menu item updated");
    fetch(pool, id).await
}

/// Soft-delete an item; it disappears from listings but keeps history
pub async fn archive_menu_item(pool: &SqlitePool, id: i64) -> AppResult<()> {
    repository::menu_item::archive(pool, id).await?;
    info!(id, "menu item archived");
    Ok(())
}

/// Bring an archived item back as available
pub async fn restore_menu_item(pool: &SqlitePool, id: i64) -> AppResult<MenuItem> {
    let item = repository::menu_item::restore(pool, id).await?;
    info!(id, "menu item restored");
    Ok(item)
}

/// Flip availability without touching anything else
pub async fn toggle_menu_item(pool: &SqlitePool, id: i64) -> AppResult<MenuItem> {
    Ok(repository::menu_item::toggle_availability(pool, id).await?)
}

async fn fetch(pool: &SqlitePool, id: i64) -> AppResult<MenuItem> {
    repository::menu_item::get(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Menu item {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ComponentInput;
    use crate::db::test_pool;

    fn plain_item(name: &str, price: f64) -> MenuItemCreate {
        MenuItemCreate {
            name: name.to_string(),
            price,
            category_id: None,
            available: None,
            status: None,
            is_bundle: None,
            image: None,
            components: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_bundle_with_components() {
        let pool = test_pool().await;
        let rice = create_menu_item(&pool, plain_item("Rice", 2.0)).await.unwrap();
        let ramen = create_menu_item(&pool, plain_item("Ramen", 9.5)).await.unwrap();

        let mut bundle = plain_item("Combo", 10.5);
        bundle.is_bundle = Some(true);
        bundle.components = vec![
            ComponentInput {
                menu_item_id: ramen.id,
                quantity: 1,
            },
            ComponentInput {
                menu_item_id: rice.id,
                quantity: 1,
            },
            ComponentInput {
                menu_item_id: rice.id,
                quantity: 1,
            },
        ];

        let created = create_menu_item(&pool, bundle).await.unwrap();
        assert!(created.is_bundle);
        assert_eq!(created.components.len(), 2);
        let rice_row = created
            .components
            .iter()
            .find(|c| c.component_id == rice.id)
            .unwrap();
        assert_eq!(rice_row.quantity, 2);
    }

    #[tokio::test]
    async fn test_components_on_plain_item_rejected() {
        let pool = test_pool().await;
        let rice = create_menu_item(&pool, plain_item("Rice", 2.0)).await.unwrap();

        let mut item = plain_item("Not a bundle", 5.0);
        item.components = vec![ComponentInput {
            menu_item_id: rice.id,
            quantity: 1,
        }];

        let err = create_menu_item(&pool, item).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidComposition(_)));
    }

    #[tokio::test]
    async fn test_update_self_reference_rolls_back() {
        let pool = test_pool().await;
        let rice = create_menu_item(&pool, plain_item("Rice", 2.0)).await.unwrap();

        let mut bundle = plain_item("Combo", 8.0);
        bundle.is_bundle = Some(true);
        bundle.components = vec![ComponentInput {
            menu_item_id: rice.id,
            quantity: 1,
        }];
        let combo = create_menu_item(&pool, bundle).await.unwrap();

        let update = MenuItemUpdate {
            components: Some(vec![ComponentInput {
                menu_item_id: combo.id,
                quantity: 1,
            }]),
            ..Default::default()
        };
        let err = update_menu_item(&pool, combo.id, update).await.unwrap_err();
        assert!(matches!(err, AppError::SelfReference));

        // Original composition survives the failed update
        let reloaded = repository::menu_item::get(&pool, combo.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.components.len(), 1);
        assert_eq!(reloaded.components[0].component_id, rice.id);
    }

    #[tokio::test]
    async fn test_demote_bundle_detaches_components() {
        let pool = test_pool().await;
        let rice = create_menu_item(&pool, plain_item("Rice", 2.0)).await.unwrap();

        let mut bundle = plain_item("Combo", 8.0);
        bundle.is_bundle = Some(true);
        bundle.components = vec![ComponentInput {
            menu_item_id: rice.id,
            quantity: 1,
        }];
        let combo = create_menu_item(&pool, bundle).await.unwrap();

        let update = MenuItemUpdate {
            is_bundle: Some(false),
            ..Default::default()
        };
        let updated = update_menu_item(&pool, combo.id, update).await.unwrap();
        assert!(!updated.is_bundle);
        assert!(updated.components.is_empty());
    }

    #[tokio::test]
    async fn test_status_alias_wins_over_available() {
        let pool = test_pool().await;
        let mut item = plain_item("Tea", 3.0);
        item.available = Some(true);
        item.status = Some(false);

        let created = create_menu_item(&pool, item).await.unwrap();
        assert!(!created.available);
        assert!(!created.status());
    }
}
