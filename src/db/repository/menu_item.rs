//! Menu Item Repository
//!
//! Pool-level reads and lifecycle toggles, plus connection-level write
//! helpers used by the catalog service inside its transactions.

use super::{RepoError, RepoResult};
use crate::db::models::{BundleComponent, MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::utils::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str =
    "id, name, price, category_id, available, is_bundle, image, created_at, updated_at, deleted_at";

/// Find all live menu items with components loaded
pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let mut items = sqlx::query_as::<_, MenuItem>(&format!(
        "SELECT {COLUMNS} FROM menu_item WHERE deleted_at IS NULL ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    for item in &mut items {
        if item.is_bundle {
            item.components = load_components(pool, item.id).await?;
        }
    }
    Ok(items)
}

/// Find live menu items currently available for sale
pub async fn list_available(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let mut items = sqlx::query_as::<_, MenuItem>(&format!(
        "SELECT {COLUMNS} FROM menu_item WHERE available = 1 AND deleted_at IS NULL ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    for item in &mut items {
        if item.is_bundle {
            item.components = load_components(pool, item.id).await?;
        }
    }
    Ok(items)
}

/// Find menu item by id, archived included, with components loaded
pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let item =
        sqlx::query_as::<_, MenuItem>(&format!("SELECT {COLUMNS} FROM menu_item WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    match item {
        Some(mut item) => {
            if item.is_bundle {
                item.components = load_components(pool, item.id).await?;
            }
            Ok(Some(item))
        }
        None => Ok(None),
    }
}

/// Find a live (not archived) menu item inside a caller-owned transaction
pub async fn find_live(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<MenuItem>> {
    let item = sqlx::query_as::<_, MenuItem>(&format!(
        "SELECT {COLUMNS} FROM menu_item WHERE id = ? AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(item)
}

/// Load the component rows of a bundle, joined with their menu items
pub async fn load_components(pool: &SqlitePool, bundle_id: i64) -> RepoResult<Vec<BundleComponent>> {
    let components = sqlx::query_as::<_, BundleComponent>(
        "SELECT bc.component_id, mi.name, mi.price, bc.quantity
         FROM bundle_component bc
         JOIN menu_item mi ON mi.id = bc.component_id
         WHERE bc.bundle_id = ?
         ORDER BY bc.component_id",
    )
    .bind(bundle_id)
    .fetch_all(pool)
    .await?;
    Ok(components)
}

/// Insert a menu item row; the catalog service owns the surrounding transaction
pub async fn insert(
    conn: &mut SqliteConnection,
    data: &MenuItemCreate,
    available: bool,
    is_bundle: bool,
    now: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO menu_item (name, price, category_id, available, is_bundle, image, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(data.category_id)
    .bind(available)
    .bind(is_bundle)
    .bind(&data.image)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Patch menu item fields; the catalog service owns the surrounding transaction
pub async fn update_fields(
    conn: &mut SqliteConnection,
    id: i64,
    data: &MenuItemUpdate,
    available: Option<bool>,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE menu_item SET name = COALESCE(?1, name), price = COALESCE(?2, price), category_id = COALESCE(?3, category_id), available = COALESCE(?4, available), is_bundle = COALESCE(?5, is_bundle), image = COALESCE(?6, image), updated_at = ?7 WHERE id = ?8 AND deleted_at IS NULL",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(data.category_id)
    .bind(available)
    .bind(data.is_bundle)
    .bind(&data.image)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    Ok(())
}

/// Replace the full component set of a bundle (sync semantics).
/// Every component id must reference a live menu item.
pub async fn replace_components(
    conn: &mut SqliteConnection,
    bundle_id: i64,
    components: &[(i64, i64)],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM bundle_component WHERE bundle_id = ?")
        .bind(bundle_id)
        .execute(&mut *conn)
        .await?;

    for &(component_id, quantity) in components {
        let exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM menu_item WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(component_id)
        .fetch_one(&mut *conn)
        .await?;
        if exists == 0 {
            return Err(RepoError::NotFound(format!(
                "Component menu item {component_id} not found"
            )));
        }

        sqlx::query(
            "INSERT INTO bundle_component (bundle_id, component_id, quantity) VALUES (?1, ?2, ?3)",
        )
        .bind(bundle_id)
        .bind(component_id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Remove all components from a bundle
pub async fn detach_components(conn: &mut SqliteConnection, bundle_id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM bundle_component WHERE bundle_id = ?")
        .bind(bundle_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Flip the available flag
pub async fn toggle_availability(pool: &SqlitePool, id: i64) -> RepoResult<MenuItem> {
    let rows = sqlx::query(
        "UPDATE menu_item SET available = NOT available, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

/// Archive (soft delete): item leaves sale but keeps its history
pub async fn archive(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE menu_item SET available = 0, deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    Ok(())
}

/// Restore an archived item back to sale
pub async fn restore(pool: &SqlitePool, id: i64) -> RepoResult<MenuItem> {
    let rows = sqlx::query(
        "UPDATE menu_item SET available = 1, deleted_at = NULL, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NOT NULL",
    )
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn seed_item(pool: &SqlitePool, name: &str, price: f64) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO menu_item (name, price, created_at, updated_at) VALUES (?1, ?2, 0, 0) RETURNING id",
        )
        .bind(name)
        .bind(price)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_archive_restore_cycle() {
        let pool = test_pool().await;
        let id = seed_item(&pool, "Shoyu Ramen", 10.0).await;

        archive(&pool, id).await.unwrap();
        let archived = get(&pool, id).await.unwrap().unwrap();
        assert!(archived.deleted_at.is_some());
        assert!(!archived.available);
        assert!(!archived.status());

        // Archived items are invisible to live lookups
        let mut conn = pool.acquire().await.unwrap();
        assert!(find_live(&mut *conn, id).await.unwrap().is_none());
        drop(conn);

        let restored = restore(&pool, id).await.unwrap();
        assert!(restored.deleted_at.is_none());
        assert!(restored.available);
        assert!(restored.status());
    }

    #[tokio::test]
    async fn test_toggle_availability() {
        let pool = test_pool().await;
        let id = seed_item(&pool, "Miso Ramen", 11.0).await;

        let item = toggle_availability(&pool, id).await.unwrap();
        assert!(!item.available);
        let item = toggle_availability(&pool, id).await.unwrap();
        assert!(item.available);
    }
}
