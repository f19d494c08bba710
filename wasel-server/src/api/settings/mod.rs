//! Payment Settings API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/settings/payment",
        get(handler::get_settings).put(handler::update_settings),
    )
}
