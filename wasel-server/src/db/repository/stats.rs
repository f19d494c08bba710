//! Reporting Queries
//!
//! Aggregations over completed orders and wallet activity. Windows are
//! half-open `[start, end)` Unix-millis ranges.

use super::RepoResult;
use crate::db::models::{FinancialSummary, MethodRevenueRow};
use shared::money::{percentage_of, to_decimal};
use sqlx::SqlitePool;

pub async fn financial_summary(
    pool: &SqlitePool,
    start: i64,
    end: i64,
) -> RepoResult<FinancialSummary> {
    let (completed_orders, total_revenue, total_delivery_fees): (i64, f64, f64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(total_amount), 0), COALESCE(SUM(delivery_fee), 0) \
         FROM orders WHERE status = 'completed' AND created_at >= ? AND created_at < ?",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    let mut by_method = sqlx::query_as::<_, MethodRevenueRow>(
        "SELECT payment_method, COUNT(*) AS order_count, \
                COALESCE(SUM(total_amount), 0) AS revenue \
         FROM orders WHERE status = 'completed' AND created_at >= ? AND created_at < ? \
         GROUP BY payment_method ORDER BY payment_method",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    // Commission is recorded as debit transactions, one per charged party
    let (total_commission,): (f64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(amount), 0) FROM wallet_transaction \
         WHERE payment_type = 'commission' AND created_at >= ? AND created_at < ?",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    // Zero-guarded: with no revenue every share reads 0, never NaN
    let total = to_decimal(total_revenue);
    for row in &mut by_method {
        row.revenue_share_percent = percentage_of(to_decimal(row.revenue), total);
    }

    Ok(FinancialSummary {
        start,
        end,
        completed_orders,
        total_revenue,
        total_delivery_fees,
        total_commission,
        by_method,
    })
}
