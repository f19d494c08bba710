//! Vendor / Driver Repository

use super::RepoResult;
use crate::db::models::{Driver, Vendor};
use shared::DriverStatus;
use sqlx::{SqliteConnection, SqlitePool};

pub async fn find_vendor_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Vendor>> {
    let row = sqlx::query_as::<_, Vendor>(
        "SELECT id, name, store_name, is_active, created_at FROM vendor WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_driver_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Driver>> {
    let row = sqlx::query_as::<_, Driver>(
        "SELECT id, name, status, is_active, created_at FROM driver WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// All active drivers, available first
pub async fn list_active_drivers(pool: &SqlitePool) -> RepoResult<Vec<Driver>> {
    let rows = sqlx::query_as::<_, Driver>(
        "SELECT id, name, status, is_active, created_at FROM driver \
         WHERE is_active = 1 \
         ORDER BY CASE status WHEN 'available' THEN 0 WHEN 'busy' THEN 1 ELSE 2 END, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn set_driver_status(
    conn: &mut SqliteConnection,
    driver_id: i64,
    status: DriverStatus,
) -> RepoResult<()> {
    sqlx::query("UPDATE driver SET status = ? WHERE id = ?")
        .bind(status)
        .bind(driver_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn insert_vendor(
    conn: &mut SqliteConnection,
    id: i64,
    name: &str,
    store_name: &str,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("INSERT INTO vendor (id, name, store_name, created_at) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(store_name)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn insert_driver(
    conn: &mut SqliteConnection,
    id: i64,
    name: &str,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("INSERT INTO driver (id, name, created_at) VALUES (?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
