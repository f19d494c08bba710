//! Reporting models

use serde::Serialize;
use shared::PaymentMethod;

/// Revenue for one payment method over a reporting window
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MethodRevenueRow {
    pub payment_method: PaymentMethod,
    pub order_count: i64,
    pub revenue: f64,
    /// Share of total revenue (percent); 0 when there is no revenue yet
    #[sqlx(default)]
    pub revenue_share_percent: f64,
}

/// ملخص مالي — financial summary over a reporting window
#[derive(Debug, Clone, Serialize)]
pub struct FinancialSummary {
    pub start: i64,
    pub end: i64,
    pub completed_orders: i64,
    pub total_revenue: f64,
    pub total_delivery_fees: f64,
    pub total_commission: f64,
    pub by_method: Vec<MethodRevenueRow>,
}
