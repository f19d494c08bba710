//! Wallet API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{WalletBalance, WalletTransaction};
use crate::utils::error::{AppResponse, ok};
use crate::utils::AppResult;
use crate::wallet;
use shared::OwnerType;

pub async fn balance(
    State(state): State<ServerState>,
    Path((owner_type, owner_id)): Path<(OwnerType, i64)>,
) -> AppResult<Json<AppResponse<WalletBalance>>> {
    Ok(ok(wallet::get_balance(&state.pool, owner_type, owner_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ChargePayload {
    pub amount: f64,
    pub description: Option<String>,
}

pub async fn charge(
    State(state): State<ServerState>,
    Path((owner_type, owner_id)): Path<(OwnerType, i64)>,
    Json(payload): Json<ChargePayload>,
) -> AppResult<Json<AppResponse<WalletTransaction>>> {
    let tx = wallet::charge(
        &state.pool,
        owner_type,
        owner_id,
        payload.amount,
        payload.description,
    )
    .await?;
    Ok(ok(tx))
}

#[derive(Debug, Deserialize)]
pub struct WithdrawPayload {
    pub amount: f64,
}

pub async fn withdraw(
    State(state): State<ServerState>,
    Path((owner_type, owner_id)): Path<(OwnerType, i64)>,
    Json(payload): Json<WithdrawPayload>,
) -> AppResult<Json<AppResponse<WalletTransaction>>> {
    let tx = wallet::withdraw(&state.pool, owner_type, owner_id, payload.amount).await?;
    Ok(ok(tx))
}

#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

pub async fn transactions(
    State(state): State<ServerState>,
    Path((owner_type, owner_id)): Path<(OwnerType, i64)>,
    Query(query): Query<LedgerQuery>,
) -> AppResult<Json<AppResponse<Vec<WalletTransaction>>>> {
    let txs = wallet::list_transactions(
        &state.pool,
        owner_type,
        owner_id,
        query.limit,
        query.offset,
    )
    .await?;
    Ok(ok(txs))
}
