//! Statistics API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::FinancialSummary;
use crate::db::repository::stats;
use crate::utils::error::{AppResponse, ok};
use crate::utils::{AppError, AppResult};

/// Half-open reporting window `[start, end)` in Unix millis
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub start: i64,
    pub end: i64,
}

pub async fn financial(
    State(state): State<ServerState>,
    Query(query): Query<WindowQuery>,
) -> AppResult<Json<AppResponse<FinancialSummary>>> {
    if query.end <= query.start {
        return Err(AppError::validation("end must be after start"));
    }
    Ok(ok(
        stats::financial_summary(&state.pool, query.start, query.end).await?,
    ))
}
