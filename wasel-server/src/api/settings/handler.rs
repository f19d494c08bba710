//! Payment Settings API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::{PaymentSettings, PaymentSettingsPatch};
use crate::settings;
use crate::utils::AppResult;
use crate::utils::error::{AppResponse, ok};

pub async fn get_settings(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<PaymentSettings>>> {
    Ok(ok(settings::get(&state.pool).await?))
}

pub async fn update_settings(
    State(state): State<ServerState>,
    Json(patch): Json<PaymentSettingsPatch>,
) -> AppResult<Json<AppResponse<PaymentSettings>>> {
    Ok(ok(settings::update(&state.pool, patch).await?))
}
