//! Rating models

use serde::{Deserialize, Serialize};
use shared::ParticipantRole;
use std::collections::BTreeMap;

/// التقييم — one rating per (order, from, to) direction
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rating {
    pub id: i64,
    pub order_id: i64,
    pub from_type: ParticipantRole,
    pub from_id: i64,
    pub to_type: ParticipantRole,
    pub to_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: i64,
}

/// Input for submitting a rating
#[derive(Debug, Clone, Deserialize)]
pub struct RatingCreate {
    pub order_id: i64,
    pub from_type: ParticipantRole,
    pub from_id: i64,
    pub to_type: ParticipantRole,
    pub to_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Aggregate rating view for dashboards
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatingStats {
    /// Mean star value; 0.0 when no ratings exist
    pub average: f64,
    pub total: i64,
    /// star value → count; stars with no ratings are omitted
    pub distribution: BTreeMap<i32, i64>,
}

impl RatingStats {
    pub fn empty() -> Self {
        Self {
            average: 0.0,
            total: 0,
            distribution: BTreeMap::new(),
        }
    }
}

/// One month of the yearly rating report
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MonthlyRatingRow {
    /// 1-12
    pub month: i32,
    pub total: i64,
    pub average: f64,
}
