//! Wallet Ledger
//!
//! Available and pending balances per vendor/driver, backed by an append-only
//! transaction ledger. Every balance mutation pairs a ledger row with an
//! atomic SQL increment in one transaction; the balance is never computed in
//! application code and written back.

use crate::db::models::{Wallet, WalletBalance, WalletTransaction};
use crate::db::repository::wallet as wallet_repo;
use crate::utils::validation::{MAX_NOTE_LEN, validate_amount, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::util::{now_millis, snowflake_id};
use shared::{OwnerType, PaymentType, TxStatus, TxType};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Balance view for an owner. A wallet that has never received a posting
/// reads as zero on both sides.
pub async fn get_balance(
    pool: &SqlitePool,
    owner_type: OwnerType,
    owner_id: i64,
) -> AppResult<WalletBalance> {
    let wallet = wallet_repo::find_by_owner(pool, owner_type, owner_id).await?;
    Ok(wallet.as_ref().map(WalletBalance::from).unwrap_or(WalletBalance {
        available: 0.0,
        pending: 0.0,
    }))
}

/// Admin top-up: one completed `admin_charge` credit plus the matching
/// balance increment.
pub async fn charge(
    pool: &SqlitePool,
    owner_type: OwnerType,
    owner_id: i64,
    amount: f64,
    description: Option<String>,
) -> AppResult<WalletTransaction> {
    validate_amount(amount, "amount")?;
    validate_optional_text(&description, "description", MAX_NOTE_LEN)?;

    let now = now_millis();
    let mut tx = pool.begin().await?;
    let wallet = wallet_repo::ensure_wallet(&mut *tx, owner_type, owner_id).await?;

    let record = WalletTransaction {
        id: snowflake_id(),
        wallet_id: wallet.id,
        amount,
        tx_type: TxType::Credit,
        payment_type: PaymentType::AdminCharge,
        status: TxStatus::Completed,
        description: description.unwrap_or_else(|| "شحن رصيد من الإدارة".to_string()),
        order_id: None,
        created_at: now,
        cleared_at: None,
    };
    wallet_repo::insert_transaction(&mut *tx, &record).await?;
    wallet_repo::apply_balance_delta(&mut *tx, wallet.id, amount, now).await?;
    tx.commit().await?;

    info!(wallet_id = wallet.id, %owner_type, owner_id, amount, "Wallet charged");
    Ok(record)
}

/// Manual payout. Fails with a business-rule error when the available
/// balance does not cover the amount; the pending balance never backs a
/// withdrawal.
pub async fn withdraw(
    pool: &SqlitePool,
    owner_type: OwnerType,
    owner_id: i64,
    amount: f64,
) -> AppResult<WalletTransaction> {
    validate_amount(amount, "amount")?;

    let wallet = require_wallet(pool, owner_type, owner_id).await?;

    let now = now_millis();
    let mut tx = pool.begin().await?;
    let rows = wallet_repo::apply_guarded_debit(&mut *tx, wallet.id, amount, now).await?;
    if rows == 0 {
        return Err(AppError::business_rule(format!(
            "Insufficient balance: requested {amount}, available {}",
            wallet.balance
        )));
    }

    let record = WalletTransaction {
        id: snowflake_id(),
        wallet_id: wallet.id,
        amount,
        tx_type: TxType::Debit,
        payment_type: PaymentType::Withdrawal,
        status: TxStatus::Completed,
        description: "سحب رصيد".to_string(),
        order_id: None,
        created_at: now,
        cleared_at: None,
    };
    wallet_repo::insert_transaction(&mut *tx, &record).await?;
    tx.commit().await?;

    info!(wallet_id = wallet.id, %owner_type, owner_id, amount, "Withdrawal recorded");
    Ok(record)
}

/// Ledger page for an owner, newest first
pub async fn list_transactions(
    pool: &SqlitePool,
    owner_type: OwnerType,
    owner_id: i64,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<WalletTransaction>> {
    let wallet = require_wallet(pool, owner_type, owner_id).await?;
    let limit = limit.clamp(1, 200);
    Ok(wallet_repo::list_transactions(pool, wallet.id, limit, offset.max(0)).await?)
}

/// Clear pending credits created before `cutoff`: each one flips to
/// completed and its amount moves pending → available. Deferred commission
/// debits are then retried against the freshly credited balances. Returns
/// how many transactions resolved.
///
/// Safe to run concurrently: every flip is conditional on the row still
/// being pending, and amounts only move when the flip won.
pub async fn release_cleared(pool: &SqlitePool, cutoff: i64) -> AppResult<u64> {
    let now = now_millis();
    let mut tx = pool.begin().await?;

    let due = wallet_repo::find_pending_before(&mut *tx, cutoff).await?;
    let mut released = 0u64;
    for record in &due {
        let rows = wallet_repo::mark_cleared(&mut *tx, record.id, now).await?;
        if rows == 0 {
            continue; // another pass got it first
        }
        wallet_repo::apply_pending_delta(&mut *tx, record.wallet_id, -record.amount, now).await?;
        wallet_repo::apply_balance_delta(&mut *tx, record.wallet_id, record.amount, now).await?;
        released += 1;
    }

    // Deferred commissions collect as soon as the balance covers them
    let owed = wallet_repo::find_pending_debits(&mut *tx).await?;
    for record in &owed {
        let rows = wallet_repo::apply_guarded_debit(&mut *tx, record.wallet_id, record.amount, now)
            .await?;
        if rows == 0 {
            continue; // still underfunded, retried next pass
        }
        wallet_repo::mark_cleared(&mut *tx, record.id, now).await?;
        released += 1;
    }
    tx.commit().await?;

    if released > 0 {
        info!(released, cutoff, "Pending funds cleared");
    }
    Ok(released)
}

async fn require_wallet(
    pool: &SqlitePool,
    owner_type: OwnerType,
    owner_id: i64,
) -> AppResult<Wallet> {
    wallet_repo::find_by_owner(pool, owner_type, owner_id)
        .await?
        .ok_or_else(|| {
            warn!(%owner_type, owner_id, "Wallet lookup failed");
            AppError::not_found(format!("No wallet for {owner_type} {owner_id}"))
        })
}
