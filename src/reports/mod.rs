//! Reports
//!
//! Read-only aggregations over completed orders. Everything is
//! computed in SQL from the immutable order snapshots, so reports stay
//! correct even after menu items are edited or archived.

use crate::db::repository::RepoResult;
use serde::Serialize;
use sqlx::SqlitePool;

/// Sales totals for a time range, completed orders only
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SalesSummary {
    pub order_count: i64,
    pub gross_sales: f64,
    pub total_discounts: f64,
    pub net_sales: f64,
}

/// Completed sales grouped by employee
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EmployeeSales {
    pub employee_id: i64,
    pub employee_name: String,
    pub order_count: i64,
    pub net_sales: f64,
}

/// Best-selling menu items by quantity, from order item snapshots
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TopItem {
    pub menu_item_id: i64,
    pub item_name: String,
    pub quantity_sold: i64,
    pub net_sales: f64,
}

/// Aggregate sales for completed orders created within `[from, to]`
/// (Unix millis, inclusive).
pub async fn sales_summary(pool: &SqlitePool, from: i64, to: i64) -> RepoResult<SalesSummary> {
    let summary = sqlx::query_as::<_, SalesSummary>(
        "SELECT COUNT(*) AS order_count,
            COALESCE(SUM(subtotal), 0.0) AS gross_sales,
            COALESCE(SUM(total_discount), 0.0) AS total_discounts,
            COALESCE(SUM(total_amount), 0.0) AS net_sales
         FROM orders
         WHERE status = 'completed' AND created_at >= ?1 AND created_at <= ?2",
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;
    Ok(summary)
}

/// Completed sales per employee, highest net sales first.
pub async fn employee_sales(pool: &SqlitePool, from: i64, to: i64) -> RepoResult<Vec<EmployeeSales>> {
    let rows = sqlx::query_as::<_, EmployeeSales>(
        "SELECT e.id AS employee_id,
            e.name AS employee_name,
            COUNT(o.id) AS order_count,
            COALESCE(SUM(o.total_amount), 0.0) AS net_sales
         FROM orders o
         JOIN employee e ON e.id = o.employee_id
         WHERE o.status = 'completed' AND o.created_at >= ?1 AND o.created_at <= ?2
         GROUP BY e.id, e.name
         ORDER BY net_sales DESC",
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Best sellers by quantity within the range. Uses the snapshot name,
/// so renamed or archived items report as they were sold.
pub async fn top_items(
    pool: &SqlitePool,
    from: i64,
    to: i64,
    limit: i64,
) -> RepoResult<Vec<TopItem>> {
    let rows = sqlx::query_as::<_, TopItem>(
        "SELECT oi.menu_item_id,
            oi.item_name,
            SUM(oi.quantity) AS quantity_sold,
            COALESCE(SUM(oi.total_amount), 0.0) AS net_sales
         FROM order_item oi
         JOIN orders o ON o.id = oi.order_id
         WHERE o.status = 'completed' AND o.created_at >= ?1 AND o.created_at <= ?2
         GROUP BY oi.menu_item_id, oi.item_name
         ORDER BY quantity_sold DESC
         LIMIT ?3",
    )
    .bind(from)
    .bind(to)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
