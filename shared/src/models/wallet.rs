//! Wallet ledger vocabulary

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::to_decimal;

/// صاحب المحفظة — wallets exist per vendor and per driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OwnerType {
    Vendor,
    Driver,
}

impl OwnerType {
    pub fn as_str(self) -> &'static str {
        match self {
            OwnerType::Vendor => "vendor",
            OwnerType::Driver => "driver",
        }
    }
}

impl std::fmt::Display for OwnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger direction. Amounts are stored positive; the type carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TxType {
    Credit,
    Debit,
}

impl TxType {
    /// Signed amount of a transaction of this type
    pub fn signed(self, amount: f64) -> Decimal {
        match self {
            TxType::Credit => to_decimal(amount),
            TxType::Debit => -to_decimal(amount),
        }
    }
}

/// What kind of money movement a transaction records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PaymentType {
    /// Order settled cash-on-delivery
    Cash,
    /// Order settled electronically
    Electronic,
    /// Manual payout to the owner
    Withdrawal,
    /// Platform commission deduction
    Commission,
    /// Manual admin top-up
    AdminCharge,
}

/// Transaction lifecycle: pending funds clear into the available balance
/// after the configured clearing delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TxStatus {
    Completed,
    Pending,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_amounts_carry_direction() {
        assert_eq!(TxType::Credit.signed(40.0), to_decimal(40.0));
        assert_eq!(TxType::Debit.signed(40.0), -to_decimal(40.0));
    }
}
