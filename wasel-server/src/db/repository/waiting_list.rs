//! Driver Waiting-List Repository
//!
//! The partial unique index on (order_id) WHERE status = 'pending' makes a
//! second pending insert fail as a duplicate, which the dispatch service
//! reports as a conflict.

use super::RepoResult;
use crate::db::models::WaitingListEntry;
use shared::WaitingStatus;
use sqlx::{SqliteConnection, SqlitePool};

pub async fn insert_pending(
    conn: &mut SqliteConnection,
    id: i64,
    order_id: i64,
    vendor_id: i64,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO driver_waiting_list (id, order_id, vendor_id, status, created_at, updated_at) \
         VALUES (?, ?, ?, 'pending', ?, ?)",
    )
    .bind(id)
    .bind(order_id)
    .bind(vendor_id)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn find_pending_by_order(
    pool: &SqlitePool,
    order_id: i64,
) -> RepoResult<Option<WaitingListEntry>> {
    let row = sqlx::query_as::<_, WaitingListEntry>(
        "SELECT id, order_id, vendor_id, status, created_at, updated_at \
         FROM driver_waiting_list WHERE order_id = ? AND status = 'pending'",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Move the pending entry (if any) for this order to `matched`/`cancelled`.
/// Affecting zero rows is fine: not every order goes through the queue.
pub async fn resolve_pending(
    conn: &mut SqliteConnection,
    order_id: i64,
    resolution: WaitingStatus,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE driver_waiting_list SET status = ?, updated_at = ? \
         WHERE order_id = ? AND status = 'pending'",
    )
    .bind(resolution)
    .bind(now)
    .bind(order_id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

/// Pending queue for one vendor, oldest first
pub async fn list_pending_by_vendor(
    pool: &SqlitePool,
    vendor_id: i64,
) -> RepoResult<Vec<WaitingListEntry>> {
    let rows = sqlx::query_as::<_, WaitingListEntry>(
        "SELECT id, order_id, vendor_id, status, created_at, updated_at \
         FROM driver_waiting_list WHERE vendor_id = ? AND status = 'pending' \
         ORDER BY created_at",
    )
    .bind(vendor_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
