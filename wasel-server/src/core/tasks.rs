//! Background tasks
//!
//! One periodic worker: clearing pending wallet funds whose holding delay
//! has elapsed. The task runs until its cancellation token fires during
//! graceful shutdown.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::core::ServerState;
use crate::wallet;
use shared::util::now_millis;

/// Spawn the pending-funds clearing worker.
///
/// Every `CLEARING_INTERVAL_SECS` it releases pending credits older than
/// `PENDING_CLEARING_HOURS`. Errors are logged and the loop keeps running;
/// a failed pass just retries on the next tick.
pub fn spawn_clearing_task(state: ServerState, shutdown: CancellationToken) -> JoinHandle<()> {
    let interval = Duration::from_secs(state.config.clearing_interval_secs.max(1));
    let delay_ms = state.config.clearing_delay_ms();

    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            holding_hours = state.config.pending_clearing_hours,
            "Clearing task started"
        );
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so startup stays quiet
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Clearing task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let cutoff = now_millis() - delay_ms;
                    match wallet::release_cleared(&state.pool, cutoff).await {
                        Ok(0) => {}
                        Ok(n) => info!(released = n, "Clearing pass finished"),
                        Err(e) => error!(error = %e, "Clearing pass failed"),
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::WalletTransaction;
    use crate::db::repository::wallet as wallet_repo;
    use shared::util::snowflake_id;
    use shared::{OwnerType, PaymentType, TxStatus, TxType};

    // Real time on purpose: a paused clock makes the sqlx pool's internal
    // acquire timeout fire immediately. The 1s test interval keeps this
    // under a few seconds.
    #[tokio::test]
    async fn worker_clears_overdue_pending_credits() {
        let state = ServerState::for_tests().await;

        // One pending credit well past the 24h holding delay
        let now = now_millis();
        let mut tx = state.pool.begin().await.unwrap();
        let wallet = wallet_repo::ensure_wallet(&mut *tx, OwnerType::Driver, 20)
            .await
            .unwrap();
        let record = WalletTransaction {
            id: snowflake_id(),
            wallet_id: wallet.id,
            amount: 45.0,
            tx_type: TxType::Credit,
            payment_type: PaymentType::Cash,
            status: TxStatus::Pending,
            description: String::new(),
            order_id: None,
            created_at: now - 25 * 3_600_000,
            cleared_at: None,
        };
        wallet_repo::insert_transaction(&mut *tx, &record).await.unwrap();
        wallet_repo::apply_pending_delta(&mut *tx, wallet.id, 45.0, now).await.unwrap();
        tx.commit().await.unwrap();

        let shutdown = CancellationToken::new();
        let handle = spawn_clearing_task(state.clone(), shutdown.clone());

        // The immediate tick is skipped, so the first pass lands at ~1s
        tokio::time::sleep(Duration::from_millis(2500)).await;

        let updated = wallet_repo::find_by_owner(&state.pool, OwnerType::Driver, 20)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.balance, 45.0);
        assert_eq!(updated.pending_balance, 0.0);

        shutdown.cancel();
        handle.await.unwrap();
    }
}
