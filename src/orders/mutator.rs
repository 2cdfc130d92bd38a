//! Order Mutator
//!
//! Lifecycle changes on existing orders. Status follows a one-way
//! machine (pending may complete or cancel, terminal states are
//! frozen), header patches never re-price line items, and deletion is
//! refused once an order has completed.

use crate::db::models::{Order, OrderStatus, OrderUpdate};
use crate::db::repository::{self, RepoError};
use crate::utils::{AppError, AppResult};
use sqlx::SqlitePool;
use tracing::info;

/// Transition an order to a new status.
///
/// Re-applying the current status is an idempotent no-op; any other
/// move from a terminal state is rejected.
pub async fn update_status(pool: &SqlitePool, id: i64, next: OrderStatus) -> AppResult<Order> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let current = repository::order::get_status(&mut *tx, id).await?;
    if !current.can_transition_to(next) {
        return Err(AppError::InvalidTransition {
            from: current.to_string(),
            to: next.to_string(),
        });
    }
    if current != next {
        repository::order::set_status(&mut *tx, id, next).await?;
    }
    tx.commit().await.map_err(RepoError::from)?;

    info!(order_id = id, from = %current, to = %next, "order status changed");
    Ok(repository::order::find_by_id(pool, id).await?)
}

/// Patch the order header (employee, table number). Totals and line
/// items are left exactly as they were placed.
pub async fn update_order(pool: &SqlitePool, id: i64, data: OrderUpdate) -> AppResult<Order> {
    if let Some(ref table_number) = data.table_number
        && table_number.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Table number must not be empty".to_string(),
        ));
    }

    repository::order::update_header(pool, id, &data).await?;
    Ok(repository::order::find_by_id(pool, id).await?)
}

/// Delete an order and its line items. Completed orders are part of
/// the sales record and cannot be deleted.
pub async fn delete_order(pool: &SqlitePool, id: i64) -> AppResult<Order> {
    let order = repository::order::find_by_id(pool, id).await?;

    // The guard reads the status inside the delete transaction, so a
    // concurrent completion cannot slip between check and delete
    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let current = repository::order::get_status(&mut *tx, id).await?;
    if current == OrderStatus::Completed {
        return Err(AppError::Conflict(
            "Order cannot be deleted because it is completed".to_string(),
        ));
    }
    repository::order::delete(&mut *tx, id).await?;
    tx.commit().await.map_err(RepoError::from)?;

    info!(order_id = id, order_number = %order.order_number, "order deleted");
    Ok(order)
}
