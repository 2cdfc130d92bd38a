//! Order Numbering
//!
//! Numbers are `YYYYMMDD` plus a zero-padded daily sequence, e.g.
//! `202608300001`. The counter lives in its own table and is bumped
//! with an atomic upsert inside the order's transaction, so two
//! concurrent creates can never draw the same number and a rolled-back
//! order leaves a gap instead of a duplicate.

use crate::db::repository::RepoResult;
use crate::utils::today_stamp;
use sqlx::SqliteConnection;

/// Draw the next order number for today.
pub async fn next_order_number(conn: &mut SqliteConnection) -> RepoResult<String> {
    let day = today_stamp();
    let seq: i64 = sqlx::query_scalar(
        "INSERT INTO order_sequence (day, seq) VALUES (?1, 1)
         ON CONFLICT(day) DO UPDATE SET seq = seq + 1
         RETURNING seq",
    )
    .bind(&day)
    .fetch_one(&mut *conn)
    .await?;

    Ok(format!("{day}{seq:04}"))
}
