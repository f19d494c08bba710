//! Payment Settings Service
//!
//! Typed, versioned payment configuration. Updates are partial and carry the
//! version the caller last read; a stale version is a conflict, never a
//! silent overwrite.

use crate::db::models::{PaymentSettings, PaymentSettingsPatch};
use crate::db::repository::settings as settings_repo;
use crate::utils::{AppError, AppResult};
use shared::util::now_millis;
use sqlx::SqlitePool;
use tracing::info;

pub async fn get(pool: &SqlitePool) -> AppResult<PaymentSettings> {
    Ok(settings_repo::get(pool).await?)
}

pub async fn update(pool: &SqlitePool, patch: PaymentSettingsPatch) -> AppResult<PaymentSettings> {
    if let Some(pct) = patch.delivery_commission_percent {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return Err(AppError::validation(format!(
                "Commission percent must be between 0 and 100, got {pct}"
            )));
        }
    }

    let mut tx = pool.begin().await?;
    let rows = settings_repo::update_partial(&mut *tx, &patch, now_millis()).await?;
    if rows == 0 {
        return Err(AppError::conflict(format!(
            "Payment settings changed since version {}; reload and retry",
            patch.expected_version
        )));
    }
    tx.commit().await?;

    let current = settings_repo::get(pool).await?;
    info!(
        version = current.version,
        commission = current.delivery_commission_percent,
        "Payment settings updated"
    );
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;

    #[tokio::test]
    async fn seeded_defaults_are_present() {
        let pool = memory_pool().await;
        let settings = get(&pool).await.unwrap();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.delivery_commission_percent, 10.0);
        assert!(settings.cash_enabled && settings.electronic_enabled && settings.wallet_enabled);
        assert!(!settings.auto_charge_vendor);
        assert!(!settings.auto_deduct_from_driver);
    }

    #[tokio::test]
    async fn partial_update_bumps_version_and_keeps_other_fields() {
        let pool = memory_pool().await;
        let updated = update(
            &pool,
            PaymentSettingsPatch {
                delivery_commission_percent: Some(15.0),
                expected_version: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.version, 2);
        assert_eq!(updated.delivery_commission_percent, 15.0);
        // Untouched fields survive
        assert!(updated.cash_enabled);
        assert!(!updated.auto_charge_vendor);
    }

    #[tokio::test]
    async fn stale_version_is_a_conflict() {
        let pool = memory_pool().await;
        update(
            &pool,
            PaymentSettingsPatch {
                cash_enabled: Some(false),
                expected_version: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // Second writer still holds version 1
        let err = update(
            &pool,
            PaymentSettingsPatch {
                wallet_enabled: Some(false),
                expected_version: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let current = get(&pool).await.unwrap();
        assert_eq!(current.version, 2);
        assert!(current.wallet_enabled);
    }

    #[tokio::test]
    async fn commission_percent_is_bounded() {
        let pool = memory_pool().await;
        for bad in [-1.0, 101.0, f64::NAN] {
            let err = update(
                &pool,
                PaymentSettingsPatch {
                    delivery_commission_percent: Some(bad),
                    expected_version: 1,
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }
}
