//! Order Repository
//!
//! Row access for orders, line items and the append-only status history.
//! Status mutations are conditional updates (`WHERE status = <expected>`)
//! so concurrent writers fail instead of silently overwriting each other.

use super::RepoResult;
use crate::db::models::{Order, OrderItem, StatusHistoryEntry};
use shared::OrderStatus;
use sqlx::{SqliteConnection, SqlitePool};

const ORDER_COLUMNS: &str = "id, customer_id, vendor_id, driver_id, subtotal, delivery_fee, \
     total_amount, payment_method, status, created_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// List orders, newest first, optionally filtered by status and/or vendor
pub async fn list(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    vendor_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders \
         WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR vendor_id = ?2) \
         ORDER BY created_at DESC LIMIT ?3 OFFSET ?4"
    ))
    .bind(status)
    .bind(vendor_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, name, quantity, unit_price \
         FROM order_item WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_history(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<StatusHistoryEntry>> {
    let rows = sqlx::query_as::<_, StatusHistoryEntry>(
        "SELECT id, order_id, status, note, actor_id, created_at \
         FROM order_status_history WHERE order_id = ? ORDER BY created_at, id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, customer_id, vendor_id, driver_id, subtotal, delivery_fee, \
         total_amount, payment_method, status, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(order.id)
    .bind(order.customer_id)
    .bind(order.vendor_id)
    .bind(order.driver_id)
    .bind(order.subtotal)
    .bind(order.delivery_fee)
    .bind(order.total_amount)
    .bind(order.payment_method)
    .bind(order.status)
    .bind(order.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert_item(conn: &mut SqliteConnection, item: &OrderItem) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item (id, order_id, product_id, name, quantity, unit_price) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(item.id)
    .bind(item.order_id)
    .bind(item.product_id)
    .bind(&item.name)
    .bind(item.quantity)
    .bind(item.unit_price)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Append one status-history row. History is insert-only; rows are never
/// touched again.
pub async fn append_history(
    conn: &mut SqliteConnection,
    entry: &StatusHistoryEntry,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_status_history (id, order_id, status, note, actor_id, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(entry.id)
    .bind(entry.order_id)
    .bind(entry.status)
    .bind(&entry.note)
    .bind(entry.actor_id)
    .bind(entry.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Conditionally move an order from `expected` to `target`.
///
/// Returns the number of affected rows: 0 means a concurrent writer already
/// moved the order (or it never was in `expected`).
pub async fn set_status(
    conn: &mut SqliteConnection,
    order_id: i64,
    expected: OrderStatus,
    target: OrderStatus,
) -> RepoResult<u64> {
    let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ? AND status = ?")
        .bind(target)
        .bind(order_id)
        .bind(expected)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

/// Claim an order for a driver: sets driver_id and moves straight to
/// `delivering`, but only while the order is assignable and unclaimed.
/// 0 affected rows = lost the race or illegal state.
pub async fn claim_for_driver(
    conn: &mut SqliteConnection,
    order_id: i64,
    driver_id: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE orders SET driver_id = ?, status = 'delivering' \
         WHERE id = ? AND driver_id IS NULL \
         AND status IN ('processing', 'waiting-for-driver')",
    )
    .bind(driver_id)
    .bind(order_id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}
