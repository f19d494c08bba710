//! Settlement — turning completed orders into wallet postings
//!
//! `split` computes the plan; `settle_order` applies it inside the caller's
//! transaction so settlement commits (or aborts) together with the
//! completion transition.

pub mod split;

pub use split::{Posting, SettlementPlan, build_plan};

use crate::db::models::{Order, PaymentSettings, WalletTransaction};
use crate::db::repository::wallet as wallet_repo;
use crate::utils::AppResult;
use shared::money::to_money;
use shared::util::{now_millis, snowflake_id};
use shared::{PaymentType, TxStatus, TxType};
use sqlx::SqliteConnection;
use tracing::info;

/// Apply the settlement plan for a completed order.
///
/// Wallets are created lazily on first posting. Completed postings move the
/// available balance; pending credits move the pending balance; the actual
/// balances only change through atomic SQL increments.
///
/// Commission debits never overdraw: when the available balance cannot cover
/// one (a cash order's shares are still pending), the debit is recorded
/// `pending` with no balance change and collected by the clearing task once
/// funds arrive. Only wallet-mode debits may drive a balance negative.
pub async fn settle_order(
    conn: &mut SqliteConnection,
    order: &Order,
    settings: &PaymentSettings,
) -> AppResult<()> {
    let plan = build_plan(order, settings);
    let now = now_millis();

    for posting in &plan.postings {
        let wallet = wallet_repo::ensure_wallet(conn, posting.owner_type, posting.owner_id).await?;

        let mut tx = WalletTransaction {
            id: snowflake_id(),
            wallet_id: wallet.id,
            amount: posting.amount,
            tx_type: posting.tx_type,
            payment_type: posting.payment_type,
            status: posting.status,
            description: posting.description.clone(),
            order_id: Some(order.id),
            created_at: now,
            cleared_at: None,
        };

        match posting.status {
            TxStatus::Completed => {
                if posting.tx_type == TxType::Debit
                    && posting.payment_type == PaymentType::Commission
                {
                    let rows =
                        wallet_repo::apply_guarded_debit(conn, wallet.id, posting.amount, now)
                            .await?;
                    if rows == 0 {
                        // Deferred until the owner's pending funds clear
                        tx.status = TxStatus::Pending;
                    }
                } else {
                    let delta = to_money(posting.tx_type.signed(posting.amount));
                    wallet_repo::apply_balance_delta(conn, wallet.id, delta, now).await?;
                }
            }
            TxStatus::Pending => {
                // Only credits hold in the pending balance
                if posting.tx_type == TxType::Credit {
                    wallet_repo::apply_pending_delta(conn, wallet.id, posting.amount, now).await?;
                }
            }
            TxStatus::Failed => {}
        }

        wallet_repo::insert_transaction(conn, &tx).await?;
    }

    info!(
        order_id = order.id,
        postings = plan.postings.len(),
        method = %order.payment_method,
        "Order settled"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::db::repository::actor;
    use shared::money::money_eq;
    use shared::{OrderStatus, OwnerType, PaymentMethod};

    async fn seed_actors(conn: &mut SqliteConnection) {
        actor::insert_vendor(conn, 10, "سوق الخير", "متجر الخير", now_millis())
            .await
            .unwrap();
        actor::insert_driver(conn, 20, "سائق الاختبار", now_millis())
            .await
            .unwrap();
    }

    fn completed_order(method: PaymentMethod) -> Order {
        Order {
            id: 5001,
            customer_id: 1,
            vendor_id: 10,
            driver_id: Some(20),
            subtotal: 60.0,
            delivery_fee: 10.0,
            total_amount: 70.0,
            payment_method: method,
            status: OrderStatus::Completed,
            created_at: now_millis(),
        }
    }

    fn settings(commission: f64, charge_vendor: bool, deduct_driver: bool) -> PaymentSettings {
        PaymentSettings {
            id: 1,
            version: 1,
            delivery_commission_percent: commission,
            auto_deduct_from_driver: deduct_driver,
            auto_charge_vendor: charge_vendor,
            cash_enabled: true,
            electronic_enabled: true,
            wallet_enabled: true,
            updated_at: now_millis(),
        }
    }

    async fn insert_order(conn: &mut SqliteConnection, order: &Order) {
        crate::db::repository::order::insert(conn, order).await.unwrap();
    }

    #[tokio::test]
    async fn cash_settlement_holds_funds_pending() {
        let pool = memory_pool().await;
        let mut tx = pool.begin().await.unwrap();
        seed_actors(&mut *tx).await;
        let order = completed_order(PaymentMethod::Cash);
        insert_order(&mut *tx, &order).await;

        settle_order(&mut *tx, &order, &settings(10.0, false, false))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let vendor = wallet_repo::find_by_owner(&pool, OwnerType::Vendor, 10)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(vendor.balance, 0.0);
        assert_eq!(vendor.pending_balance, 60.0);

        let driver = wallet_repo::find_by_owner(&pool, OwnerType::Driver, 20)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(driver.balance, 0.0);
        assert_eq!(driver.pending_balance, 10.0);
    }

    #[tokio::test]
    async fn wallet_settlement_overdraws_driver() {
        let pool = memory_pool().await;
        let mut tx = pool.begin().await.unwrap();
        seed_actors(&mut *tx).await;
        let order = completed_order(PaymentMethod::Wallet);
        insert_order(&mut *tx, &order).await;

        settle_order(&mut *tx, &order, &settings(25.0, false, false))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let vendor = wallet_repo::find_by_owner(&pool, OwnerType::Vendor, 10)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(vendor.balance, 70.0);

        let driver = wallet_repo::find_by_owner(&pool, OwnerType::Driver, 20)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(driver.balance, -70.0);
        assert_eq!(driver.pending_balance, 0.0);
    }

    #[tokio::test]
    async fn commission_debits_land_in_available_balance() {
        let pool = memory_pool().await;
        let mut tx = pool.begin().await.unwrap();
        seed_actors(&mut *tx).await;
        let order = completed_order(PaymentMethod::Electronic);
        insert_order(&mut *tx, &order).await;

        settle_order(&mut *tx, &order, &settings(15.0, true, true))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let vendor = wallet_repo::find_by_owner(&pool, OwnerType::Vendor, 10)
            .await
            .unwrap()
            .unwrap();
        assert!(money_eq(vendor.balance, 51.0)); // +60 − 9.0

        let driver = wallet_repo::find_by_owner(&pool, OwnerType::Driver, 20)
            .await
            .unwrap()
            .unwrap();
        assert!(money_eq(driver.balance, 8.5)); // +10 − 1.5
    }

    #[tokio::test]
    async fn cash_commission_defers_instead_of_overdrawing() {
        let pool = memory_pool().await;
        let mut tx = pool.begin().await.unwrap();
        seed_actors(&mut *tx).await;
        let order = completed_order(PaymentMethod::Cash);
        insert_order(&mut *tx, &order).await;

        settle_order(&mut *tx, &order, &settings(15.0, true, true))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        // Shares are pending, so the commission cannot be taken yet; the
        // available balance must not go negative
        let vendor = wallet_repo::find_by_owner(&pool, OwnerType::Vendor, 10)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(vendor.balance, 0.0);
        assert_eq!(vendor.pending_balance, 60.0);

        let commission: Vec<_> =
            wallet_repo::list_transactions(&pool, vendor.id, 50, 0)
                .await
                .unwrap()
                .into_iter()
                .filter(|t| t.payment_type == PaymentType::Commission)
                .collect();
        assert_eq!(commission.len(), 1);
        assert_eq!(commission[0].status, TxStatus::Pending);

        // Once the cash shares clear, the deferred commissions collect
        let resolved = crate::wallet::release_cleared(&pool, now_millis() + 1)
            .await
            .unwrap();
        assert_eq!(resolved, 4); // 2 credits + 2 commissions

        let vendor = wallet_repo::find_by_owner(&pool, OwnerType::Vendor, 10)
            .await
            .unwrap()
            .unwrap();
        assert!(money_eq(vendor.balance, 51.0)); // 60 − 9.0
        assert_eq!(vendor.pending_balance, 0.0);

        let driver = wallet_repo::find_by_owner(&pool, OwnerType::Driver, 20)
            .await
            .unwrap()
            .unwrap();
        assert!(money_eq(driver.balance, 8.5)); // 10 − 1.5
    }
}
