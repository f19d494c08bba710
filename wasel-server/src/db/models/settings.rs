//! Payment settings model

use serde::{Deserialize, Serialize};
use shared::PaymentMethod;

/// إعدادات الدفع — versioned single-row configuration
///
/// Commission and per-method switches used to live in one mutable JSON blob
/// saved wholesale by two different dashboard screens; here they are typed
/// fields updated partially under an optimistic version check.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PaymentSettings {
    pub id: i64,
    /// Incremented on every update; writers must present the version they read
    pub version: i64,
    /// نسبة عمولة التوصيل (percent, e.g. 15 = 15%)
    pub delivery_commission_percent: f64,
    /// Deduct driver-side commission automatically on settlement
    pub auto_deduct_from_driver: bool,
    /// Charge vendor-side commission automatically on settlement
    pub auto_charge_vendor: bool,
    pub cash_enabled: bool,
    pub electronic_enabled: bool,
    pub wallet_enabled: bool,
    pub updated_at: i64,
}

impl PaymentSettings {
    /// Whether orders may be created with the given payment method
    pub fn method_enabled(&self, method: PaymentMethod) -> bool {
        match method {
            PaymentMethod::Cash => self.cash_enabled,
            PaymentMethod::Electronic => self.electronic_enabled,
            PaymentMethod::Wallet => self.wallet_enabled,
        }
    }
}

/// Partial update: only supplied fields change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentSettingsPatch {
    pub delivery_commission_percent: Option<f64>,
    pub auto_deduct_from_driver: Option<bool>,
    pub auto_charge_vendor: Option<bool>,
    pub cash_enabled: Option<bool>,
    pub electronic_enabled: Option<bool>,
    pub wallet_enabled: Option<bool>,
    /// Version the caller read; update fails with a conflict if stale
    pub expected_version: i64,
}
