//! Rating Repository

use super::RepoResult;
use crate::db::models::{MonthlyRatingRow, Rating, RatingStats};
use shared::ParticipantRole;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::BTreeMap;

pub async fn insert(conn: &mut SqliteConnection, rating: &Rating) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO rating (id, order_id, from_type, from_id, to_type, to_id, rating, comment, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(rating.id)
    .bind(rating.order_id)
    .bind(rating.from_type)
    .bind(rating.from_id)
    .bind(rating.to_type)
    .bind(rating.to_id)
    .bind(rating.rating)
    .bind(&rating.comment)
    .bind(rating.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Aggregate stats for one target (or a whole role when `to_id` is None).
///
/// Zero ratings yields `{average: 0, total: 0, distribution: {}}` — the
/// average is computed from the counts, never by dividing by the row total.
pub async fn stats(
    pool: &SqlitePool,
    to_type: ParticipantRole,
    to_id: Option<i64>,
) -> RepoResult<RatingStats> {
    let rows: Vec<(i32, i64)> = sqlx::query_as(
        "SELECT rating, COUNT(*) FROM rating \
         WHERE to_type = ?1 AND (?2 IS NULL OR to_id = ?2) \
         GROUP BY rating",
    )
    .bind(to_type)
    .bind(to_id)
    .fetch_all(pool)
    .await?;

    let mut distribution = BTreeMap::new();
    let mut total: i64 = 0;
    let mut weighted: i64 = 0;
    for (star, count) in rows {
        distribution.insert(star, count);
        total += count;
        weighted += i64::from(star) * count;
    }

    let average = if total == 0 {
        0.0
    } else {
        // 2dp is enough for a star average
        (weighted as f64 / total as f64 * 100.0).round() / 100.0
    };

    Ok(RatingStats {
        average,
        total,
        distribution,
    })
}

/// Per-month rating report for a role over one calendar year
pub async fn report_by_month(
    pool: &SqlitePool,
    to_type: ParticipantRole,
    year_start: i64,
    year_end: i64,
) -> RepoResult<Vec<MonthlyRatingRow>> {
    let rows = sqlx::query_as::<_, MonthlyRatingRow>(
        "SELECT CAST(strftime('%m', created_at / 1000, 'unixepoch') AS INTEGER) AS month, \
                COUNT(*) AS total, \
                ROUND(AVG(rating), 2) AS average \
         FROM rating \
         WHERE to_type = ? AND created_at >= ? AND created_at < ? \
         GROUP BY month ORDER BY month",
    )
    .bind(to_type)
    .bind(year_start)
    .bind(year_end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
