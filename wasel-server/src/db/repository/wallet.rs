//! Wallet Repository
//!
//! Balance mutations are atomic increments at the storage layer
//! (`balance = balance + ?`), never read-modify-write in application code,
//! so concurrent postings to the same wallet cannot lose updates.

use super::{RepoError, RepoResult};
use crate::db::models::{Wallet, WalletTransaction};
use shared::OwnerType;
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

const WALLET_COLUMNS: &str = "id, owner_type, owner_id, balance, pending_balance, updated_at";
const TX_COLUMNS: &str = "id, wallet_id, amount, tx_type, payment_type, status, description, \
     order_id, created_at, cleared_at";

pub async fn find_by_owner(
    pool: &SqlitePool,
    owner_type: OwnerType,
    owner_id: i64,
) -> RepoResult<Option<Wallet>> {
    let row = sqlx::query_as::<_, Wallet>(&format!(
        "SELECT {WALLET_COLUMNS} FROM wallet WHERE owner_type = ? AND owner_id = ?"
    ))
    .bind(owner_type)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Get or create the wallet for an owner. Wallets are created lazily on the
/// first posting; INSERT OR IGNORE keeps this race-free under the unique
/// (owner_type, owner_id) constraint.
pub async fn ensure_wallet(
    conn: &mut SqliteConnection,
    owner_type: OwnerType,
    owner_id: i64,
) -> RepoResult<Wallet> {
    sqlx::query(
        "INSERT OR IGNORE INTO wallet (id, owner_type, owner_id, balance, pending_balance, updated_at) \
         VALUES (?, ?, ?, 0, 0, ?)",
    )
    .bind(snowflake_id())
    .bind(owner_type)
    .bind(owner_id)
    .bind(now_millis())
    .execute(&mut *conn)
    .await?;

    let wallet = sqlx::query_as::<_, Wallet>(&format!(
        "SELECT {WALLET_COLUMNS} FROM wallet WHERE owner_type = ? AND owner_id = ?"
    ))
    .bind(owner_type)
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?;

    wallet.ok_or_else(|| RepoError::Database("Failed to ensure wallet".into()))
}

pub async fn insert_transaction(
    conn: &mut SqliteConnection,
    tx: &WalletTransaction,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO wallet_transaction \
         (id, wallet_id, amount, tx_type, payment_type, status, description, order_id, created_at, cleared_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(tx.id)
    .bind(tx.wallet_id)
    .bind(tx.amount)
    .bind(tx.tx_type)
    .bind(tx.payment_type)
    .bind(tx.status)
    .bind(&tx.description)
    .bind(tx.order_id)
    .bind(tx.created_at)
    .bind(tx.cleared_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Atomic available-balance adjustment (delta may be negative)
pub async fn apply_balance_delta(
    conn: &mut SqliteConnection,
    wallet_id: i64,
    delta: f64,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE wallet SET balance = balance + ?, updated_at = ? WHERE id = ?")
        .bind(delta)
        .bind(now)
        .bind(wallet_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Atomic pending-balance adjustment (delta may be negative)
pub async fn apply_pending_delta(
    conn: &mut SqliteConnection,
    wallet_id: i64,
    delta: f64,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE wallet SET pending_balance = pending_balance + ?, updated_at = ? WHERE id = ?",
    )
    .bind(delta)
    .bind(now)
    .bind(wallet_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Conditional debit: only succeeds if the wallet holds enough available
/// funds. 0 affected rows = insufficient balance.
pub async fn apply_guarded_debit(
    conn: &mut SqliteConnection,
    wallet_id: i64,
    amount: f64,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE wallet SET balance = balance - ?1, updated_at = ?2 \
         WHERE id = ?3 AND balance >= ?1",
    )
    .bind(amount)
    .bind(now)
    .bind(wallet_id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn list_transactions(
    pool: &SqlitePool,
    wallet_id: i64,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<WalletTransaction>> {
    let rows = sqlx::query_as::<_, WalletTransaction>(&format!(
        "SELECT {TX_COLUMNS} FROM wallet_transaction WHERE wallet_id = ? \
         ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    ))
    .bind(wallet_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Pending credit transactions created before `cutoff`, oldest first
pub async fn find_pending_before(
    conn: &mut SqliteConnection,
    cutoff: i64,
) -> RepoResult<Vec<WalletTransaction>> {
    let rows = sqlx::query_as::<_, WalletTransaction>(&format!(
        "SELECT {TX_COLUMNS} FROM wallet_transaction \
         WHERE status = 'pending' AND tx_type = 'credit' AND created_at < ? \
         ORDER BY created_at"
    ))
    .bind(cutoff)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

/// Deferred commission debits: recorded when settlement found insufficient
/// available funds, collected once the owner's pending credits clear
pub async fn find_pending_debits(conn: &mut SqliteConnection) -> RepoResult<Vec<WalletTransaction>> {
    let rows = sqlx::query_as::<_, WalletTransaction>(&format!(
        "SELECT {TX_COLUMNS} FROM wallet_transaction \
         WHERE status = 'pending' AND tx_type = 'debit' \
         ORDER BY created_at"
    ))
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

/// Mark a pending transaction completed. Conditional on it still being
/// pending so two clearing passes cannot double-apply. 0 rows = already done.
pub async fn mark_cleared(
    conn: &mut SqliteConnection,
    tx_id: i64,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE wallet_transaction SET status = 'completed', cleared_at = ? \
         WHERE id = ? AND status = 'pending'",
    )
    .bind(now)
    .bind(tx_id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}
