//! Order Repository
//!
//! Connection-level helpers run inside the order builder's transaction;
//! pool-level reads serve queries and statistics. Header totals are
//! always recomputed by re-summing the stored line items in `Decimal`.

use super::{RepoError, RepoResult};
use crate::db::models::{Order, OrderFilter, OrderItem, OrderStats, OrderStatus, OrderUpdate};
use crate::pricing::money::{to_decimal, to_f64};
use crate::utils::now_millis;
use rust_decimal::Decimal;
use sqlx::{SqliteConnection, SqlitePool};

const ORDER_COLUMNS: &str = "id, order_number, employee_id, table_number, status, subtotal, total_discount, total_amount, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, order_id, menu_item_id, item_name, unit_price, quantity, subtotal, discount_id, discount_name, discount_type, discount_amount, total_amount, created_at";

/// Values of one line item at insert time; everything is already computed
/// and rounded by the order builder.
#[derive(Debug, Clone)]
pub struct OrderItemInsert {
    pub menu_item_id: i64,
    pub item_name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub subtotal: f64,
    pub discount_id: Option<i64>,
    pub discount_name: Option<String>,
    pub discount_type: Option<String>,
    pub discount_amount: f64,
    pub total_amount: f64,
}

/// Whether an employee row exists and is not soft-deleted
pub async fn employee_exists(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM employee WHERE id = ? AND deleted_at IS NULL")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
    Ok(count > 0)
}

/// Insert the order header in pending status with zeroed totals
pub async fn insert_order(
    conn: &mut SqliteConnection,
    order_number: &str,
    employee_id: i64,
    table_number: &str,
    now: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (order_number, employee_id, table_number, status, subtotal, total_discount, total_amount, created_at, updated_at) VALUES (?1, ?2, ?3, 'pending', 0, 0, 0, ?4, ?4) RETURNING id",
    )
    .bind(order_number)
    .bind(employee_id)
    .bind(table_number)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Insert one line item snapshot
pub async fn insert_item(
    conn: &mut SqliteConnection,
    order_id: i64,
    item: &OrderItemInsert,
    now: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO order_item (order_id, menu_item_id, item_name, unit_price, quantity, subtotal, discount_id, discount_name, discount_type, discount_amount, total_amount, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12) RETURNING id",
    )
    .bind(order_id)
    .bind(item.menu_item_id)
    .bind(&item.item_name)
    .bind(item.unit_price)
    .bind(item.quantity)
    .bind(item.subtotal)
    .bind(item.discount_id)
    .bind(&item.discount_name)
    .bind(&item.discount_type)
    .bind(item.discount_amount)
    .bind(item.total_amount)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Re-sum the stored line items and persist the header totals.
/// Sums run in `Decimal`; existing snapshots are never re-resolved.
pub async fn recompute_totals(conn: &mut SqliteConnection, order_id: i64) -> RepoResult<()> {
    let rows: Vec<(f64, f64, f64)> = sqlx::query_as(
        "SELECT subtotal, discount_amount, total_amount FROM order_item WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut subtotal = Decimal::ZERO;
    let mut total_discount = Decimal::ZERO;
    let mut total_amount = Decimal::ZERO;
    for (item_subtotal, item_discount, item_total) in rows {
        subtotal += to_decimal(item_subtotal);
        total_discount += to_decimal(item_discount);
        total_amount += to_decimal(item_total);
    }

    sqlx::query(
        "UPDATE orders SET subtotal = ?1, total_discount = ?2, total_amount = ?3, updated_at = ?4 WHERE id = ?5",
    )
    .bind(to_f64(subtotal))
    .bind(to_f64(total_discount))
    .bind(to_f64(total_amount))
    .bind(now_millis())
    .bind(order_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Find order by id with line items loaded
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Order> {
    let order =
        sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    let mut order = order.ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))?;
    order.items = find_items(pool, id).await?;
    Ok(order)
}

/// Line items of one order, in insertion order
pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM order_item WHERE order_id = ? ORDER BY id"
    ))
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// List orders, newest first, with optional filters and items loaded
pub async fn list(pool: &SqlitePool, filter: &OrderFilter) -> RepoResult<Vec<Order>> {
    let mut sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE 1 = 1");
    if filter.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    if filter.employee_id.is_some() {
        sql.push_str(" AND employee_id = ?");
    }
    if filter.table_number.is_some() {
        sql.push_str(" AND table_number = ?");
    }
    if filter.created_from.is_some() {
        sql.push_str(" AND created_at >= ?");
    }
    if filter.created_to.is_some() {
        sql.push_str(" AND created_at <= ?");
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");

    let mut query = sqlx::query_as::<_, Order>(&sql);
    if let Some(status) = filter.status {
        query = query.bind(status);
    }
    if let Some(employee_id) = filter.employee_id {
        query = query.bind(employee_id);
    }
    if let Some(ref table_number) = filter.table_number {
        query = query.bind(table_number.clone());
    }
    if let Some(created_from) = filter.created_from {
        query = query.bind(created_from);
    }
    if let Some(created_to) = filter.created_to {
        query = query.bind(created_to);
    }

    let mut orders = query.fetch_all(pool).await?;
    for order in &mut orders {
        order.items = find_items(pool, order.id).await?;
    }
    Ok(orders)
}

/// Current status of an order inside a caller-owned transaction
pub async fn get_status(conn: &mut SqliteConnection, id: i64) -> RepoResult<OrderStatus> {
    let status: Option<OrderStatus> = sqlx::query_scalar("SELECT status FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    status.ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Persist a status change
pub async fn set_status(
    conn: &mut SqliteConnection,
    id: i64,
    status: OrderStatus,
) -> RepoResult<()> {
    sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now_millis())
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Patch header fields (employee, table); line items are untouched
pub async fn update_header(pool: &SqlitePool, id: i64, data: &OrderUpdate) -> RepoResult<()> {
    if let Some(employee_id) = data.employee_id {
        let mut conn = pool.acquire().await?;
        if !employee_exists(&mut conn, employee_id).await? {
            return Err(RepoError::NotFound(format!(
                "Employee {employee_id} not found"
            )));
        }
    }

    let rows = sqlx::query(
        "UPDATE orders SET employee_id = COALESCE(?1, employee_id), table_number = COALESCE(?2, table_number), updated_at = ?3 WHERE id = ?4",
    )
    .bind(data.employee_id)
    .bind(&data.table_number)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}

/// Hard delete an order; line items cascade via FK
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Order counts by status plus completed sales sums, optionally bounded
/// by a created_at range
pub async fn stats(
    pool: &SqlitePool,
    created_from: Option<i64>,
    created_to: Option<i64>,
) -> RepoResult<OrderStats> {
    let mut sql = String::from(
        "SELECT COUNT(*) AS total_orders,
            COALESCE(SUM(status = 'pending'), 0) AS pending_orders,
            COALESCE(SUM(status = 'completed'), 0) AS completed_orders,
            COALESCE(SUM(status = 'cancelled'), 0) AS cancelled_orders,
            COALESCE(SUM(CASE WHEN status = 'completed' THEN total_amount END), 0.0) AS total_sales,
            COALESCE(SUM(CASE WHEN status = 'completed' THEN total_discount END), 0.0) AS total_discounts
         FROM orders WHERE 1 = 1",
    );
    if created_from.is_some() {
        sql.push_str(" AND created_at >= ?");
    }
    if created_to.is_some() {
        sql.push_str(" AND created_at <= ?");
    }

    let mut query = sqlx::query_as::<_, OrderStats>(&sql);
    if let Some(created_from) = created_from {
        query = query.bind(created_from);
    }
    if let Some(created_to) = created_to {
        query = query.bind(created_to);
    }

    let stats = query.fetch_one(pool).await?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{EmployeeCreate, MenuItemCreate, OrderCreate, OrderLineInput};
    use crate::db::{repository, test_pool};
    use crate::orders::{create_order, update_status};

    async fn seed_order(pool: &SqlitePool, table_number: &str, quantity: i64) -> Order {
        let employee = repository::employee::create(
            pool,
            EmployeeCreate {
                name: "Aya".to_string(),
                profile: None,
            },
        )
        .await
        .unwrap();
        let item = crate::catalog::create_menu_item(
            pool,
            MenuItemCreate {
                name: format!("Ramen {table_number}"),
                price: 150.0,
                category_id: None,
                available: None,
                status: None,
                is_bundle: None,
                image: None,
                components: vec![],
            },
        )
        .await
        .unwrap();

        create_order(
            pool,
            OrderCreate {
                employee_id: employee.id,
                table_number: table_number.to_string(),
                items: vec![OrderLineInput {
                    menu_item_id: item.id,
                    quantity,
                    discount_id: None,
                }],
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_stats_counts_and_completed_sales() {
        let pool = test_pool().await;
        let completed = seed_order(&pool, "T1", 2).await;
        seed_order(&pool, "T2", 1).await;
        update_status(&pool, completed.id, OrderStatus::Completed)
            .await
            .unwrap();

        let stats = stats(&pool, None, None).await.unwrap();
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.completed_orders, 1);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.cancelled_orders, 0);
        // Only the completed order counts toward sales
        assert_eq!(stats.total_sales, 300.0);
        assert_eq!(stats.total_discounts, 0.0);
    }

    #[tokio::test]
    async fn test_list_filters_by_status_with_items() {
        let pool = test_pool().await;
        let completed = seed_order(&pool, "T1", 2).await;
        let pending = seed_order(&pool, "T2", 1).await;
        update_status(&pool, completed.id, OrderStatus::Completed)
            .await
            .unwrap();

        let found = list(
            &pool,
            &OrderFilter {
                status: Some(OrderStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, pending.id);
        assert_eq!(found[0].items.len(), 1);

        let found = list(
            &pool,
            &OrderFilter {
                table_number: Some("T1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, completed.id);

        let all = list(&pool, &OrderFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
