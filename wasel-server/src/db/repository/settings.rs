//! Payment Settings Repository
//!
//! Single versioned row, updated field-by-field under an optimistic version
//! check instead of the old read-whole/write-whole JSON blob.

use super::{RepoError, RepoResult};
use crate::db::models::{PaymentSettings, PaymentSettingsPatch};
use sqlx::{SqliteConnection, SqlitePool};

const SETTINGS_COLUMNS: &str = "id, version, delivery_commission_percent, auto_deduct_from_driver, \
     auto_charge_vendor, cash_enabled, electronic_enabled, wallet_enabled, updated_at";

pub async fn get(pool: &SqlitePool) -> RepoResult<PaymentSettings> {
    let row = sqlx::query_as::<_, PaymentSettings>(&format!(
        "SELECT {SETTINGS_COLUMNS} FROM payment_settings WHERE id = 1"
    ))
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::Database("payment_settings row missing (migration not applied?)".into()))
}

/// Apply a partial update; unsupplied fields keep their value via COALESCE.
/// 0 affected rows = the caller's version is stale.
pub async fn update_partial(
    conn: &mut SqliteConnection,
    patch: &PaymentSettingsPatch,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE payment_settings SET \
             delivery_commission_percent = COALESCE(?1, delivery_commission_percent), \
             auto_deduct_from_driver = COALESCE(?2, auto_deduct_from_driver), \
             auto_charge_vendor = COALESCE(?3, auto_charge_vendor), \
             cash_enabled = COALESCE(?4, cash_enabled), \
             electronic_enabled = COALESCE(?5, electronic_enabled), \
             wallet_enabled = COALESCE(?6, wallet_enabled), \
             version = version + 1, \
             updated_at = ?7 \
         WHERE id = 1 AND version = ?8",
    )
    .bind(patch.delivery_commission_percent)
    .bind(patch.auto_deduct_from_driver)
    .bind(patch.auto_charge_vendor)
    .bind(patch.cash_enabled)
    .bind(patch.electronic_enabled)
    .bind(patch.wallet_enabled)
    .bind(now)
    .bind(patch.expected_version)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}
