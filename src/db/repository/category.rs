//! Category Repository

use super::{RepoError, RepoResult};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::utils::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, description, is_active, created_at, updated_at, deleted_at";

/// Find all live categories ordered by name
pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category WHERE deleted_at IS NULL ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Find category by id (archived included)
pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category =
        sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM category WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(category)
}

async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category WHERE name = ? AND deleted_at IS NULL LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

/// Create a new category
pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    if find_by_name(pool, &data.name).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Category '{}' already exists",
            data.name
        )));
    }

    let now = now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO category (name, description, is_active, created_at, updated_at) VALUES (?1, ?2, 1, ?3, ?3) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(now)
    .fetch_one(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

/// Update a category
pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let existing = get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;

    if let Some(ref new_name) = data.name
        && new_name != &existing.name
        && find_by_name(pool, new_name).await?.is_some()
    {
        return Err(RepoError::Duplicate(format!(
            "Category '{new_name}' already exists"
        )));
    }

    sqlx::query(
        "UPDATE category SET name = COALESCE(?1, name), description = COALESCE(?2, description), is_active = COALESCE(?3, is_active), updated_at = ?4 WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Soft delete a category; refused while live menu items reference it
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let in_use: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM menu_item WHERE category_id = ? AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    if in_use > 0 {
        return Err(RepoError::Validation(
            "Cannot delete category with active menu items".to_string(),
        ));
    }

    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE category SET is_active = 0, deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_create_and_duplicate_name() {
        let pool = test_pool().await;

        let cat = create(
            &pool,
            CategoryCreate {
                name: "Ramen".into(),
                description: Some("Noodle soups".into()),
            },
        )
        .await
        .unwrap();
        assert!(cat.is_active);

        let err = create(
            &pool,
            CategoryCreate {
                name: "Ramen".into(),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_delete_guard_with_menu_items() {
        let pool = test_pool().await;
        let cat = create(
            &pool,
            CategoryCreate {
                name: "Sides".into(),
                description: None,
            },
        )
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO menu_item (name, price, category_id, created_at, updated_at) VALUES ('Gyoza', 4.5, ?, 0, 0)",
        )
        .bind(cat.id)
        .execute(&pool)
        .await
        .unwrap();

        let err = delete(&pool, cat.id).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        // Archive the item, then deletion goes through
        sqlx::query("UPDATE menu_item SET deleted_at = 1 WHERE category_id = ?")
            .bind(cat.id)
            .execute(&pool)
            .await
            .unwrap();
        delete(&pool, cat.id).await.unwrap();

        let archived = get(&pool, cat.id).await.unwrap().unwrap();
        assert!(archived.deleted_at.is_some());
        assert!(!archived.is_active);
    }
}
