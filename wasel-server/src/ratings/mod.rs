//! Rating Collector
//!
//! Star ratings between order participants. Ratings are integers 1..=5 and
//! only attach to completed orders; the UNIQUE constraint allows one rating
//! per (order, from, to) direction.

use crate::db::models::{MonthlyRatingRow, Rating, RatingCreate, RatingStats};
use crate::db::repository::{RepoError, rating as rating_repo};
use crate::orders::find_order;
use crate::utils::validation::{MAX_COMMENT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};
use chrono::{TimeZone, Utc};
use shared::util::{now_millis, snowflake_id};
use shared::{OrderStatus, ParticipantRole, is_valid_rating};
use sqlx::SqlitePool;
use tracing::info;

pub async fn add_rating(pool: &SqlitePool, input: RatingCreate) -> AppResult<Rating> {
    if !is_valid_rating(input.rating) {
        return Err(AppError::validation(format!(
            "Rating must be an integer between 1 and 5, got {}",
            input.rating
        )));
    }
    if input.from_id <= 0 || input.to_id <= 0 {
        return Err(AppError::validation("Participant ids must be positive"));
    }
    if input.from_type == input.to_type && input.from_id == input.to_id {
        return Err(AppError::validation("Cannot rate yourself"));
    }
    validate_optional_text(&input.comment, "comment", MAX_COMMENT_LEN)?;

    let order = find_order(pool, input.order_id).await?;
    if order.status != OrderStatus::Completed {
        return Err(AppError::business_rule(format!(
            "Order {} is '{}'; only completed orders can be rated",
            order.id, order.status
        )));
    }

    let rating = Rating {
        id: snowflake_id(),
        order_id: input.order_id,
        from_type: input.from_type,
        from_id: input.from_id,
        to_type: input.to_type,
        to_id: input.to_id,
        rating: input.rating,
        comment: input.comment,
        created_at: now_millis(),
    };

    let mut conn = pool.acquire().await?;
    match rating_repo::insert(&mut *conn, &rating).await {
        Ok(()) => {}
        Err(RepoError::Duplicate(_)) => {
            return Err(AppError::conflict(format!(
                "Order {} was already rated by this participant",
                input.order_id
            )));
        }
        Err(e) => return Err(e.into()),
    }

    info!(
        order_id = rating.order_id,
        to_type = %rating.to_type,
        to_id = rating.to_id,
        stars = rating.rating,
        "Rating recorded"
    );
    Ok(rating)
}

/// Aggregate stats for a target, or a whole role when `to_id` is omitted
pub async fn get_stats(
    pool: &SqlitePool,
    to_type: ParticipantRole,
    to_id: Option<i64>,
) -> AppResult<RatingStats> {
    Ok(rating_repo::stats(pool, to_type, to_id).await?)
}

/// Monthly count + average for one role over a calendar year (UTC)
pub async fn report_by_month(
    pool: &SqlitePool,
    to_type: ParticipantRole,
    year: i32,
) -> AppResult<Vec<MonthlyRatingRow>> {
    if !(2000..=2100).contains(&year) {
        return Err(AppError::validation(format!("Invalid report year {year}")));
    }
    let start = Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| AppError::validation(format!("Invalid report year {year}")))?
        .timestamp_millis();
    let end = Utc
        .with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| AppError::validation(format!("Invalid report year {year}")))?
        .timestamp_millis();

    Ok(rating_repo::report_by_month(pool, to_type, start, end).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::db::models::{Order, OrderItemCreate};
    use crate::db::repository::{actor, order as order_repo};
    use chrono::Datelike;
    use shared::PaymentMethod;

    async fn seed_completed_order(pool: &SqlitePool) -> i64 {
        let mut conn = pool.acquire().await.unwrap();
        actor::insert_vendor(&mut *conn, 10, "مخبز الفجر", "الفجر", now_millis())
            .await
            .unwrap();
        actor::insert_driver(&mut *conn, 20, "ياسر", now_millis()).await.unwrap();
        drop(conn);

        let detail = crate::orders::create_order(
            pool,
            crate::db::models::OrderCreate {
                customer_id: 1,
                vendor_id: 10,
                delivery_fee: 10.0,
                payment_method: PaymentMethod::Electronic,
                items: vec![OrderItemCreate {
                    product_id: 100,
                    name: "خبز".into(),
                    quantity: 2,
                    unit_price: 5.0,
                }],
            },
        )
        .await
        .unwrap();
        let id = detail.order.id;
        crate::orders::accept_order(pool, id, None).await.unwrap();
        crate::orders::update_status(pool, id, OrderStatus::Processing, None, None)
            .await
            .unwrap();
        crate::dispatch::assign_driver(pool, id, 20).await.unwrap();
        crate::orders::update_status(pool, id, OrderStatus::Completed, None, None)
            .await
            .unwrap();
        id
    }

    fn input(order_id: i64, stars: i32) -> RatingCreate {
        RatingCreate {
            order_id,
            from_type: ParticipantRole::Customer,
            from_id: 1,
            to_type: ParticipantRole::Driver,
            to_id: 20,
            rating: stars,
            comment: None,
        }
    }

    #[tokio::test]
    async fn out_of_range_ratings_are_rejected() {
        let pool = memory_pool().await;
        let order_id = seed_completed_order(&pool).await;
        for bad in [0, 6, -1] {
            let err = add_rating(&pool, input(order_id, bad)).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "stars = {bad}");
        }
    }

    #[tokio::test]
    async fn only_completed_orders_can_be_rated() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        actor::insert_vendor(&mut *conn, 10, "مخبز", "مخبز", now_millis())
            .await
            .unwrap();
        let order = Order {
            id: 7001,
            customer_id: 1,
            vendor_id: 10,
            driver_id: None,
            subtotal: 10.0,
            delivery_fee: 0.0,
            total_amount: 10.0,
            payment_method: PaymentMethod::Cash,
            status: OrderStatus::Pending,
            created_at: now_millis(),
        };
        order_repo::insert(&mut *conn, &order).await.unwrap();
        drop(conn);

        let err = add_rating(&pool, input(7001, 4)).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn duplicate_direction_is_a_conflict() {
        let pool = memory_pool().await;
        let order_id = seed_completed_order(&pool).await;

        add_rating(&pool, input(order_id, 5)).await.unwrap();
        let err = add_rating(&pool, input(order_id, 3)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // The reverse direction is still open
        let reverse = RatingCreate {
            from_type: ParticipantRole::Driver,
            from_id: 20,
            to_type: ParticipantRole::Customer,
            to_id: 1,
            ..input(order_id, 4)
        };
        add_rating(&pool, reverse).await.unwrap();
    }

    #[tokio::test]
    async fn stats_aggregate_and_zero_case() {
        let pool = memory_pool().await;
        let order_id = seed_completed_order(&pool).await;

        // No ratings yet
        let empty = get_stats(&pool, ParticipantRole::Driver, Some(20)).await.unwrap();
        assert_eq!(empty, RatingStats::empty());

        add_rating(&pool, input(order_id, 5)).await.unwrap();
        let vendor_rating = RatingCreate {
            to_type: ParticipantRole::Vendor,
            to_id: 10,
            ..input(order_id, 4)
        };
        add_rating(&pool, vendor_rating).await.unwrap();

        let stats = get_stats(&pool, ParticipantRole::Driver, Some(20)).await.unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.average, 5.0);
        assert_eq!(stats.distribution.get(&5), Some(&1));
    }

    #[tokio::test]
    async fn monthly_report_buckets_by_created_month() {
        let pool = memory_pool().await;
        let order_id = seed_completed_order(&pool).await;
        add_rating(&pool, input(order_id, 4)).await.unwrap();

        let year = chrono::Utc::now().year();
        let report = report_by_month(&pool, ParticipantRole::Driver, year).await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].total, 1);
        assert_eq!(report[0].average, 4.0);

        assert!(report_by_month(&pool, ParticipantRole::Driver, 1890).await.is_err());
    }
}
