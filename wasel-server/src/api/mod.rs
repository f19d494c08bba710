//! API 路由模块
//!
//! One module per resource, each exposing `router()`:
//!
//! - [`health`] — liveness probe
//! - [`orders`] — lifecycle, assignment and waiting list
//! - [`wallets`] — balances, charges, withdrawals, ledger
//! - [`ratings`] — submission, stats and the monthly report
//! - [`settings`] — versioned payment settings
//! - [`statistics`] — financial summary

pub mod health;
pub mod orders;
pub mod ratings;
pub mod settings;
pub mod statistics;
pub mod wallets;

use axum::Router;

use crate::core::ServerState;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(wallets::router())
        .merge(ratings::router())
        .merge(settings::router())
        .merge(statistics::router())
        .with_state(state)
}
