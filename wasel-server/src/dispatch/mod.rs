//! Driver Assignment Service
//!
//! Two mutually exclusive paths out of `processing`: direct assignment to a
//! driver, or parking the order on the vendor-scoped waiting list. Both go
//! through conditional updates so two admins clicking at once cannot
//! double-assign an order or double-book a driver.

use crate::db::models::{DriverCandidate, StatusHistoryEntry, WaitingListEntry};
use crate::db::repository::{RepoError, actor, order as order_repo, waiting_list};
use crate::orders::find_order;
use crate::utils::{AppError, AppResult};
use shared::util::{now_millis, snowflake_id};
use shared::{DriverStatus, OrderStatus, WaitingStatus};
use sqlx::SqlitePool;
use tracing::info;

/// Assign a driver directly. The order must be in `processing` or
/// `waiting-for-driver` and unclaimed; the driver must be active and not
/// busy. On success the order moves to `delivering`, any pending
/// waiting-list entry is resolved `matched`, and the driver flips to busy.
pub async fn assign_driver(pool: &SqlitePool, order_id: i64, driver_id: i64) -> AppResult<()> {
    let order = find_order(pool, order_id).await?;
    if order.status == OrderStatus::Delivering {
        return Err(AppError::business_rule(format!(
            "Order {order_id} is already out for delivery"
        )));
    }
    if !order.status.can_transition_to(OrderStatus::Delivering) {
        return Err(AppError::business_rule(format!(
            "Cannot assign a driver to an order in '{}'",
            order.status
        )));
    }

    let driver = actor::find_driver_by_id(pool, driver_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Driver {driver_id} not found")))?;
    if !driver.is_active {
        return Err(AppError::business_rule(format!(
            "Driver '{}' is inactive",
            driver.name
        )));
    }
    if !driver.status.is_selectable() {
        return Err(AppError::business_rule(format!(
            "Driver '{}' is {} and cannot take orders",
            driver.name, driver.status
        )));
    }

    let now = now_millis();
    let mut tx = pool.begin().await?;

    let rows = order_repo::claim_for_driver(&mut *tx, order_id, driver_id).await?;
    if rows == 0 {
        return Err(AppError::conflict(format!(
            "Order {order_id} was claimed by another assignment"
        )));
    }

    order_repo::append_history(
        &mut *tx,
        &StatusHistoryEntry {
            id: snowflake_id(),
            order_id,
            status: OrderStatus::Delivering,
            note: format!("تم إسناد الطلب إلى السائق {}", driver.name),
            actor_id: None,
            created_at: now,
        },
    )
    .await?;

    waiting_list::resolve_pending(&mut *tx, order_id, WaitingStatus::Matched, now).await?;
    actor::set_driver_status(&mut *tx, driver_id, DriverStatus::Busy).await?;

    tx.commit().await?;
    info!(order_id, driver_id, "Driver assigned");
    Ok(())
}

/// Park the order on its vendor's waiting list.
///
/// The entry is inserted before the status flips; if either step fails the
/// whole transaction rolls back and the order stays in `processing`. A
/// second pending entry for the same order trips the partial unique index
/// and surfaces as `Conflict`.
pub async fn add_to_waiting_list(pool: &SqlitePool, order_id: i64) -> AppResult<WaitingListEntry> {
    let order = find_order(pool, order_id).await?;
    if !order.status.can_transition_to(OrderStatus::WaitingForDriver) {
        return Err(AppError::business_rule(format!(
            "Cannot queue an order in '{}' for a driver",
            order.status
        )));
    }

    let now = now_millis();
    let entry = WaitingListEntry {
        id: snowflake_id(),
        order_id,
        // Vendor comes from the order row itself, never from a name lookup
        vendor_id: order.vendor_id,
        status: WaitingStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    let mut tx = pool.begin().await?;

    match waiting_list::insert_pending(&mut *tx, entry.id, order_id, order.vendor_id, now).await {
        Ok(()) => {}
        Err(RepoError::Duplicate(_)) => {
            return Err(AppError::conflict(format!(
                "Order {order_id} is already on the waiting list"
            )));
        }
        Err(e) => return Err(e.into()),
    }

    order_repo::append_history(
        &mut *tx,
        &StatusHistoryEntry {
            id: snowflake_id(),
            order_id,
            status: OrderStatus::WaitingForDriver,
            note: OrderStatus::WaitingForDriver.default_note().to_string(),
            actor_id: None,
            created_at: now,
        },
    )
    .await?;

    let rows = order_repo::set_status(&mut *tx, order_id, order.status, OrderStatus::WaitingForDriver)
        .await?;
    if rows == 0 {
        return Err(AppError::conflict(format!(
            "Order {order_id} was modified by another request"
        )));
    }

    tx.commit().await?;
    info!(order_id, vendor_id = order.vendor_id, "Order queued for a driver");
    Ok(entry)
}

/// Drivers shown in the assignment picker. Busy and offline drivers are
/// listed but flagged unselectable.
pub async fn list_candidates(pool: &SqlitePool, order_id: i64) -> AppResult<Vec<DriverCandidate>> {
    find_order(pool, order_id).await?;
    let drivers = actor::list_active_drivers(pool).await?;
    Ok(drivers.into_iter().map(DriverCandidate::from).collect())
}

/// Pending waiting-list queue for one vendor, oldest first
pub async fn vendor_queue(pool: &SqlitePool, vendor_id: i64) -> AppResult<Vec<WaitingListEntry>> {
    Ok(waiting_list::list_pending_by_vendor(pool, vendor_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::db::models::OrderItemCreate;
    use crate::orders;
    use shared::PaymentMethod;

    async fn seed(pool: &SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        actor::insert_vendor(&mut *conn, 10, "مطعم النخيل", "النخيل", now_millis())
            .await
            .unwrap();
        actor::insert_driver(&mut *conn, 20, "خالد", now_millis()).await.unwrap();
        actor::insert_driver(&mut *conn, 21, "سعيد", now_millis()).await.unwrap();
    }

    async fn processing_order(pool: &SqlitePool) -> i64 {
        let detail = orders::create_order(
            pool,
            crate::db::models::OrderCreate {
                customer_id: 1,
                vendor_id: 10,
                delivery_fee: 10.0,
                payment_method: PaymentMethod::Cash,
                items: vec![OrderItemCreate {
                    product_id: 100,
                    name: "وجبة".into(),
                    quantity: 1,
                    unit_price: 60.0,
                }],
            },
        )
        .await
        .unwrap();
        let id = detail.order.id;
        orders::accept_order(pool, id, None).await.unwrap();
        orders::update_status(pool, id, OrderStatus::Processing, None, None)
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn assignment_moves_order_and_busies_driver() {
        let pool = memory_pool().await;
        seed(&pool).await;
        let order_id = processing_order(&pool).await;

        assign_driver(&pool, order_id, 20).await.unwrap();

        let order = find_order(&pool, order_id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Delivering);
        assert_eq!(order.driver_id, Some(20));

        let driver = actor::find_driver_by_id(&pool, 20).await.unwrap().unwrap();
        assert_eq!(driver.status, DriverStatus::Busy);

        let history = order_repo::find_history(&pool, order_id).await.unwrap();
        let last = history.last().unwrap();
        assert_eq!(last.status, OrderStatus::Delivering);
        assert!(last.note.contains("خالد"));
    }

    #[tokio::test]
    async fn busy_driver_is_rejected() {
        let pool = memory_pool().await;
        seed(&pool).await;
        let first = processing_order(&pool).await;
        let second = processing_order(&pool).await;

        assign_driver(&pool, first, 20).await.unwrap();
        let err = assign_driver(&pool, second, 20).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn delivering_order_cannot_be_reassigned() {
        let pool = memory_pool().await;
        seed(&pool).await;
        let order_id = processing_order(&pool).await;

        assign_driver(&pool, order_id, 20).await.unwrap();
        let err = assign_driver(&pool, order_id, 21).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn waiting_list_holds_one_pending_entry_per_order() {
        let pool = memory_pool().await;
        seed(&pool).await;
        let order_id = processing_order(&pool).await;

        let entry = add_to_waiting_list(&pool, order_id).await.unwrap();
        assert_eq!(entry.vendor_id, 10);

        let order = find_order(&pool, order_id).await.unwrap();
        assert_eq!(order.status, OrderStatus::WaitingForDriver);

        let err = add_to_waiting_list(&pool, order_id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_) | AppError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn assignment_resolves_waiting_entry() {
        let pool = memory_pool().await;
        seed(&pool).await;
        let order_id = processing_order(&pool).await;

        add_to_waiting_list(&pool, order_id).await.unwrap();
        assign_driver(&pool, order_id, 20).await.unwrap();

        assert!(
            waiting_list::find_pending_by_order(&pool, order_id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(vendor_queue(&pool, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn candidates_flag_busy_drivers() {
        let pool = memory_pool().await;
        seed(&pool).await;
        let order_id = processing_order(&pool).await;
        let other = processing_order(&pool).await;
        assign_driver(&pool, other, 21).await.unwrap();

        let candidates = list_candidates(&pool, order_id).await.unwrap();
        assert_eq!(candidates.len(), 2);
        let khaled = candidates.iter().find(|c| c.id == 20).unwrap();
        assert!(khaled.selectable);
        let saeed = candidates.iter().find(|c| c.id == 21).unwrap();
        assert!(!saeed.selectable);
    }
}
