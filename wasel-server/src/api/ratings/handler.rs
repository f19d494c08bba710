//! Rating API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{MonthlyRatingRow, Rating, RatingCreate, RatingStats};
use crate::ratings;
use crate::utils::AppResult;
use crate::utils::error::{AppResponse, ok};
use shared::ParticipantRole;

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<RatingCreate>,
) -> AppResult<Json<AppResponse<Rating>>> {
    Ok(ok(ratings::add_rating(&state.pool, input).await?))
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub to_type: ParticipantRole,
    pub to_id: Option<i64>,
}

pub async fn stats(
    State(state): State<ServerState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<AppResponse<RatingStats>>> {
    Ok(ok(
        ratings::get_stats(&state.pool, query.to_type, query.to_id).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub to_type: ParticipantRole,
    pub year: i32,
}

pub async fn report(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<AppResponse<Vec<MonthlyRatingRow>>>> {
    Ok(ok(
        ratings::report_by_month(&state.pool, query.to_type, query.year).await?,
    ))
}
