//! Wallet API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/wallets", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{owner_type}/{owner_id}/balance", get(handler::balance))
        .route("/{owner_type}/{owner_id}/charge", post(handler::charge))
        .route("/{owner_type}/{owner_id}/withdraw", post(handler::withdraw))
        .route(
            "/{owner_type}/{owner_id}/transactions",
            get(handler::transactions),
        )
}
