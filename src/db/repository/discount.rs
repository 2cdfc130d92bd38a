//! Discount Repository
//!
//! CRUD plus the eligibility reads the order builder depends on.

use super::{RepoError, RepoResult};
use crate::db::models::{Discount, DiscountCreate, DiscountUpdate};
use crate::utils::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, name, type, value, is_active, created_at, updated_at";

/// Find all discounts with their eligible sets loaded
pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<Discount>> {
    let mut discounts =
        sqlx::query_as::<_, Discount>(&format!("SELECT {COLUMNS} FROM discount ORDER BY name"))
            .fetch_all(pool)
            .await?;

    for discount in &mut discounts {
        discount.menu_item_ids = load_menu_item_ids(pool, discount.id).await?;
    }
    Ok(discounts)
}

/// Find active discounts only
pub async fn list_active(pool: &SqlitePool) -> RepoResult<Vec<Discount>> {
    let mut discounts = sqlx::query_as::<_, Discount>(&format!(
        "SELECT {COLUMNS} FROM discount WHERE is_active = 1 ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    for discount in &mut discounts {
        discount.menu_item_ids = load_menu_item_ids(pool, discount.id).await?;
    }
    Ok(discounts)
}

/// Find discount by id with eligible set loaded
pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<Discount>> {
    let discount =
        sqlx::query_as::<_, Discount>(&format!("SELECT {COLUMNS} FROM discount WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    match discount {
        Some(mut discount) => {
            discount.menu_item_ids = load_menu_item_ids(pool, discount.id).await?;
            Ok(Some(discount))
        }
        None => Ok(None),
    }
}

/// Find an active discount inside a caller-owned transaction.
/// Inactive or unknown ids yield None — stale promo codes are not errors.
pub async fn find_active(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Discount>> {
    let discount = sqlx::query_as::<_, Discount>(&format!(
        "SELECT {COLUMNS} FROM discount WHERE id = ? AND is_active = 1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(discount)
}

/// Whether a menu item is in a discount's eligible set
pub async fn is_eligible(
    conn: &mut SqliteConnection,
    discount_id: i64,
    menu_item_id: i64,
) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM discount_menu_item WHERE discount_id = ? AND menu_item_id = ?",
    )
    .bind(discount_id)
    .bind(menu_item_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count > 0)
}

async fn load_menu_item_ids(pool: &SqlitePool, discount_id: i64) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT menu_item_id FROM discount_menu_item WHERE discount_id = ? ORDER BY menu_item_id",
    )
    .bind(discount_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

/// Create a discount and attach its eligible menu items
pub async fn create(pool: &SqlitePool, data: DiscountCreate) -> RepoResult<Discount> {
    if data.value < 0.0 || !data.value.is_finite() {
        return Err(RepoError::Validation(
            "Discount value must be non-negative".to_string(),
        ));
    }

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM discount WHERE name = ?")
        .bind(&data.name)
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Err(RepoError::Duplicate(format!(
            "Discount '{}' already exists",
            data.name
        )));
    }

    let now = now_millis();
    let mut tx = pool.begin().await?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO discount (name, type, value, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.discount_type)
    .bind(data.value)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    attach_menu_items(&mut tx, id, &data.menu_item_ids).await?;
    tx.commit().await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create discount".into()))
}

/// Update a discount; a supplied eligible set replaces the old one entirely
pub async fn update(pool: &SqlitePool, id: i64, data: DiscountUpdate) -> RepoResult<Discount> {
    if let Some(value) = data.value
        && (value < 0.0 || !value.is_finite())
    {
        return Err(RepoError::Validation(
            "Discount value must be non-negative".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE discount SET name = COALESCE(?1, name), type = COALESCE(?2, type), value = COALESCE(?3, value), is_active = COALESCE(?4, is_active), updated_at = ?5 WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(data.discount_type)
    .bind(data.value)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Discount {id} not found")));
    }

    if let Some(ref menu_item_ids) = data.menu_item_ids {
        sqlx::query("DELETE FROM discount_menu_item WHERE discount_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        attach_menu_items(&mut tx, id, menu_item_ids).await?;
    }

    tx.commit().await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Discount {id} not found")))
}

/// Hard delete a discount; junction rows cascade, order item snapshots stay
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<Discount> {
    let discount = get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Discount {id} not found")))?;

    sqlx::query("DELETE FROM discount WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(discount)
}

async fn attach_menu_items(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    discount_id: i64,
    menu_item_ids: &[i64],
) -> RepoResult<()> {
    for &menu_item_id in menu_item_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO discount_menu_item (discount_id, menu_item_id) VALUES (?1, ?2)",
        )
        .bind(discount_id)
        .bind(menu_item_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::DiscountType;
    use crate::db::test_pool;

    async fn seed_item(pool: &SqlitePool, name: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO menu_item (name, price, created_at, updated_at) VALUES (?1, 10.0, 0, 0) RETURNING id",
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_eligible_set_replace() {
        let pool = test_pool().await;
        let a = seed_item(&pool, "Ramen A").await;
        let b = seed_item(&pool, "Ramen B").await;

        let discount = create(
            &pool,
            DiscountCreate {
                name: "Happy Hour".into(),
                discount_type: DiscountType::Percentage,
                value: 10.0,
                is_active: None,
                menu_item_ids: vec![a],
            },
        )
        .await
        .unwrap();
        assert_eq!(discount.menu_item_ids, vec![a]);

        let updated = update(
            &pool,
            discount.id,
            DiscountUpdate {
                menu_item_ids: Some(vec![b]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.menu_item_ids, vec![b]);

        let mut conn = pool.acquire().await.unwrap();
        assert!(!is_eligible(&mut *conn, discount.id, a).await.unwrap());
        assert!(is_eligible(&mut *conn, discount.id, b).await.unwrap());
    }

    #[tokio::test]
    async fn test_negative_value_rejected() {
        let pool = test_pool().await;
        let err = create(
            &pool,
            DiscountCreate {
                name: "Bad".into(),
                discount_type: DiscountType::Fixed,
                value: -1.0,
                is_active: None,
                menu_item_ids: vec![],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_inactive_invisible_to_find_active() {
        let pool = test_pool().await;
        let discount = create(
            &pool,
            DiscountCreate {
                name: "Off Season".into(),
                discount_type: DiscountType::Fixed,
                value: 2.0,
                is_active: Some(false),
                menu_item_ids: vec![],
            },
        )
        .await
        .unwrap();

        let mut conn = pool.acquire().await.unwrap();
        assert!(find_active(&mut *conn, discount.id).await.unwrap().is_none());
    }
}
