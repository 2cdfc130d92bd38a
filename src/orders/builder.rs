//! Order Builder
//!
//! Creates an order and its line items in a single transaction. Each
//! line snapshots the menu item's name and price and the resolved
//! discount, so later catalog edits never change a placed order.
//!
//! Discount handling at order time is forgiving: a missing, inactive,
//! or ineligible discount is skipped silently and the line is charged
//! at full price. A missing menu item or employee aborts the whole
//! order instead.

use crate::db::models::{Order, OrderCreate};
use crate::db::repository::{self, RepoError, order::OrderItemInsert};
use crate::orders::number::next_order_number;
use crate::pricing::{self, money::{to_decimal, to_f64}};
use crate::utils::{AppError, AppResult, now_millis};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Create an order from validated input.
pub async fn create_order(pool: &SqlitePool, data: OrderCreate) -> AppResult<Order> {
    if data.table_number.trim().is_empty() {
        return Err(AppError::Validation(
            "Table number must not be empty".to_string(),
        ));
    }
    if data.items.is_empty() {
        return Err(AppError::Validation(
            "Order must contain at least one item".to_string(),
        ));
    }
    for line in &data.items {
        if line.menu_item_id <= 0 {
            return Err(AppError::Validation(
                "Each line must reference a menu item".to_string(),
            ));
        }
        if line.quantity <= 0 {
            return Err(AppError::Validation(
                "Quantity must be positive".to_string(),
            ));
        }
    }

    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    if !repository::order::employee_exists(&mut *tx, data.employee_id).await? {
        return Err(AppError::NotFound(format!(
            "Employee {} not found",
            data.employee_id
        )));
    }

    let order_number = next_order_number(&mut *tx).await?;
    let now = now_millis();
    let order_id = repository::order::insert_order(
        &mut *tx,
        &order_number,
        data.employee_id,
        &data.table_number,
        now,
    )
    .await?;

    for line in &data.items {
        let item = repository::menu_item::find_live(&mut *tx, line.menu_item_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Menu item {} not found", line.menu_item_id))
            })?;

        // Resolve the requested discount; anything not applicable
        // degrades to no discount
        let mut discount = None;
        if let Some(discount_id) = line.discount_id {
            let found = repository::discount::find_active(&mut *tx, discount_id).await?;
            if let Some(found) = found
                && repository::discount::is_eligible(&mut *tx, discount_id, item.id).await?
            {
                discount = Some(found);
            } else {
                debug!(discount_id, menu_item_id = item.id, "discount not applicable, skipped");
            }
        }

        let unit_price = to_decimal(item.price);
        let subtotal = unit_price * Decimal::from(line.quantity);
        let resolved = pricing::resolve(discount.as_ref(), unit_price, line.quantity, subtotal);
        let total = subtotal - resolved.amount;

        let insert = OrderItemInsert {
            menu_item_id: item.id,
            item_name: item.name.clone(),
            unit_price: item.price,
            quantity: line.quantity,
            subtotal: to_f64(subtotal),
            discount_id: resolved.applied.as_ref().map(|a| a.id),
            discount_name: resolved.applied.as_ref().map(|a| a.name.clone()),
            discount_type: resolved
                .applied
                .as_ref()
                .map(|a| a.discount_type.as_str().to_string()),
            discount_amount: to_f64(resolved.amount),
            total_amount: to_f64(total),
        };
        repository::order::insert_item(&mut *tx, order_id, &insert, now).await?;
    }

    repository::order::recompute_totals(&mut *tx, order_id).await?;
    tx.commit().await.map_err(RepoError::from)?;

    info!(order_id, %order_number, lines = data.items.len(), "order created");
    Ok(repository::order::find_by_id(pool, order_id).await?)
}
