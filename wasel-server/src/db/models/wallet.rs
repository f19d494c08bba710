//! Wallet and ledger transaction models

use serde::{Deserialize, Serialize};
use shared::{OwnerType, PaymentType, TxStatus, TxType};

/// محفظة — per-actor running balance
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Wallet {
    pub id: i64,
    pub owner_type: OwnerType,
    pub owner_id: i64,
    /// Available funds
    pub balance: f64,
    /// Funds awaiting the clearing delay; tracked independently, never
    /// derived from `balance`
    pub pending_balance: f64,
    pub updated_at: i64,
}

/// Balance view returned by the API
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WalletBalance {
    pub available: f64,
    pub pending: f64,
}

impl From<&Wallet> for WalletBalance {
    fn from(w: &Wallet) -> Self {
        Self {
            available: w.balance,
            pending: w.pending_balance,
        }
    }
}

/// Ledger entry. `amount` is stored positive; `tx_type` carries the sign.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WalletTransaction {
    pub id: i64,
    pub wallet_id: i64,
    pub amount: f64,
    pub tx_type: TxType,
    pub payment_type: PaymentType,
    pub status: TxStatus,
    pub description: String,
    pub order_id: Option<i64>,
    pub created_at: i64,
    /// Set when a pending credit clears into the available balance
    pub cleared_at: Option<i64>,
}
