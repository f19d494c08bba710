//! Order Lifecycle Manager
//!
//! Single authority over status transitions. Every transition appends a
//! history row and flips `orders.status` with a conditional guard in the
//! same transaction, so the timeline and the status can never disagree.
//!
//! Completion triggers settlement; cancellation releases the waiting-list
//! entry and the driver.

use crate::db::models::{Order, OrderCreate, OrderDetail, OrderItem, StatusHistoryEntry};
use crate::db::repository::{actor, order as order_repo, settings as settings_repo, waiting_list};
use crate::settlement;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_QUANTITY, validate_non_negative_amount,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use rust_decimal::Decimal;
use shared::money::{to_decimal, to_money};
use shared::util::{now_millis, snowflake_id};
use shared::{DriverStatus, OrderStatus};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

/// Create an order in `pending` with its items and the initial history row,
/// all in one transaction.
pub async fn create_order(pool: &SqlitePool, draft: OrderCreate) -> AppResult<OrderDetail> {
    if draft.items.is_empty() {
        return Err(AppError::validation("Order must contain at least one item"));
    }

    let vendor = actor::find_vendor_by_id(pool, draft.vendor_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Vendor {} not found", draft.vendor_id)))?;
    if !vendor.is_active {
        return Err(AppError::business_rule(format!(
            "Vendor {} is inactive",
            vendor.id
        )));
    }

    let settings = settings_repo::get(pool).await?;
    if !settings.method_enabled(draft.payment_method) {
        return Err(AppError::business_rule(format!(
            "Payment method '{}' is currently disabled",
            draft.payment_method
        )));
    }

    validate_non_negative_amount(draft.delivery_fee, "delivery_fee")?;

    // Subtotal is derived from the items, never trusted from the client
    let mut subtotal = Decimal::ZERO;
    for item in &draft.items {
        validate_required_text(&item.name, "item name", MAX_NAME_LEN)?;
        if item.quantity <= 0 || item.quantity > MAX_QUANTITY {
            return Err(AppError::validation(format!(
                "Invalid quantity {} for item '{}'",
                item.quantity, item.name
            )));
        }
        validate_non_negative_amount(item.unit_price, "unit_price")?;
        subtotal += to_decimal(item.unit_price) * Decimal::from(item.quantity);
    }

    let now = now_millis();
    let order = Order {
        id: snowflake_id(),
        customer_id: draft.customer_id,
        vendor_id: draft.vendor_id,
        driver_id: None,
        subtotal: to_money(subtotal),
        delivery_fee: to_money(to_decimal(draft.delivery_fee)),
        total_amount: to_money(subtotal + to_decimal(draft.delivery_fee)),
        payment_method: draft.payment_method,
        status: OrderStatus::Pending,
        created_at: now,
    };

    let items: Vec<OrderItem> = draft
        .items
        .iter()
        .map(|i| OrderItem {
            id: snowflake_id(),
            order_id: order.id,
            product_id: i.product_id,
            name: i.name.clone(),
            quantity: i.quantity,
            unit_price: to_money(to_decimal(i.unit_price)),
        })
        .collect();

    let creation_entry = StatusHistoryEntry {
        id: snowflake_id(),
        order_id: order.id,
        status: OrderStatus::Pending,
        note: OrderStatus::Pending.default_note().to_string(),
        actor_id: None,
        created_at: now,
    };

    let mut tx = pool.begin().await?;
    order_repo::insert(&mut *tx, &order).await?;
    for item in &items {
        order_repo::insert_item(&mut *tx, item).await?;
    }
    order_repo::append_history(&mut *tx, &creation_entry).await?;
    tx.commit().await?;

    info!(order_id = order.id, vendor_id = order.vendor_id, total = order.total_amount,
          method = %order.payment_method, "Order created");

    Ok(OrderDetail {
        order,
        items,
        history: vec![creation_entry],
    })
}

pub async fn get_detail(pool: &SqlitePool, order_id: i64) -> AppResult<OrderDetail> {
    let order = find_order(pool, order_id).await?;
    let items = order_repo::find_items(pool, order_id).await?;
    let history = order_repo::find_history(pool, order_id).await?;
    Ok(OrderDetail {
        order,
        items,
        history,
    })
}

pub async fn list(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    vendor_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Order>> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);
    Ok(order_repo::list(pool, status, vendor_id, limit, offset).await?)
}

/// Move an order to `target`, recording the transition.
///
/// The history row is inserted first, then the status flips under a
/// `WHERE status = <expected>` guard; both share one transaction. A
/// concurrent writer that got there first surfaces as `Conflict`.
pub async fn update_status(
    pool: &SqlitePool,
    order_id: i64,
    target: OrderStatus,
    note: Option<String>,
    actor_id: Option<i64>,
) -> AppResult<Order> {
    validate_optional_text(&note, "note", MAX_NOTE_LEN)?;

    let order = find_order(pool, order_id).await?;
    if !order.status.can_transition_to(target) {
        return Err(AppError::business_rule(format!(
            "Cannot move order from '{}' to '{}'",
            order.status, target
        )));
    }

    // Settings are only needed when this transition settles the order
    let settings = if target == OrderStatus::Completed {
        Some(settings_repo::get(pool).await?)
    } else {
        None
    };

    let now = now_millis();
    let entry = StatusHistoryEntry {
        id: snowflake_id(),
        order_id,
        status: target,
        note: note.unwrap_or_else(|| target.default_note().to_string()),
        actor_id,
        created_at: now,
    };

    let mut tx = pool.begin().await?;
    order_repo::append_history(&mut *tx, &entry).await?;
    let rows = order_repo::set_status(&mut *tx, order_id, order.status, target).await?;
    if rows == 0 {
        // Lost the race; rolling back also discards the history row
        warn!(order_id, from = %order.status, to = %target, "Concurrent status change detected");
        return Err(AppError::conflict(format!(
            "Order {order_id} was modified by another request"
        )));
    }

    let updated = Order {
        status: target,
        ..order
    };

    match target {
        OrderStatus::Completed => {
            // Guarded by the settings load above
            let settings = settings
                .ok_or_else(|| AppError::internal("Settings missing for settlement"))?;
            settlement::settle_order(&mut *tx, &updated, &settings).await?;
            release_driver(&mut *tx, &updated).await?;
        }
        OrderStatus::Cancelled => {
            waiting_list::resolve_pending(&mut *tx, order_id, shared::WaitingStatus::Cancelled, now)
                .await?;
            release_driver(&mut *tx, &updated).await?;
        }
        _ => {}
    }

    tx.commit().await?;
    info!(order_id, from = %order.status, to = %target, "Order status updated");
    Ok(updated)
}

/// `pending → accepted` with the default note
pub async fn accept_order(pool: &SqlitePool, order_id: i64, actor_id: Option<i64>) -> AppResult<Order> {
    update_status(pool, order_id, OrderStatus::Accepted, None, actor_id).await
}

/// `pending → rejected`; an optional note lets the vendor state a reason
pub async fn reject_order(
    pool: &SqlitePool,
    order_id: i64,
    note: Option<String>,
    actor_id: Option<i64>,
) -> AppResult<Order> {
    update_status(pool, order_id, OrderStatus::Rejected, note, actor_id).await
}

async fn release_driver(conn: &mut SqliteConnection, order: &Order) -> AppResult<()> {
    if let Some(driver_id) = order.driver_id {
        actor::set_driver_status(conn, driver_id, DriverStatus::Available).await?;
    }
    Ok(())
}

pub(crate) async fn find_order(pool: &SqlitePool, order_id: i64) -> AppResult<Order> {
    order_repo::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::db::models::OrderItemCreate;
    use crate::db::repository::wallet as wallet_repo;
    use shared::{OwnerType, PaymentMethod};

    async fn seed(pool: &SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        actor::insert_vendor(&mut *conn, 10, "مطعم الشام", "الشام", now_millis())
            .await
            .unwrap();
        actor::insert_driver(&mut *conn, 20, "أحمد", now_millis())
            .await
            .unwrap();
    }

    fn draft(method: PaymentMethod) -> OrderCreate {
        OrderCreate {
            customer_id: 1,
            vendor_id: 10,
            delivery_fee: 10.0,
            payment_method: method,
            items: vec![
                OrderItemCreate {
                    product_id: 100,
                    name: "شاورما".into(),
                    quantity: 2,
                    unit_price: 25.0,
                },
                OrderItemCreate {
                    product_id: 101,
                    name: "عصير".into(),
                    quantity: 1,
                    unit_price: 10.0,
                },
            ],
        }
    }

    #[tokio::test]
    async fn create_order_computes_totals_and_writes_history() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let detail = create_order(&pool, draft(PaymentMethod::Cash)).await.unwrap();
        assert_eq!(detail.order.subtotal, 60.0);
        assert_eq!(detail.order.total_amount, 70.0);
        assert_eq!(detail.order.status, OrderStatus::Pending);

        let history = order_repo::find_history(&pool, detail.order.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, OrderStatus::Pending);
        assert_eq!(history[0].note, "تم إنشاء الطلب");
    }

    #[tokio::test]
    async fn create_order_rejects_empty_items() {
        let pool = memory_pool().await;
        seed(&pool).await;
        let mut d = draft(PaymentMethod::Cash);
        d.items.clear();
        let err = create_order(&pool, d).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_order_respects_method_switch() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        sqlx::query("UPDATE payment_settings SET wallet_enabled = 0 WHERE id = 1")
            .execute(&mut *conn)
            .await
            .unwrap();
        drop(conn);

        let err = create_order(&pool, draft(PaymentMethod::Wallet)).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn update_status_appends_exactly_one_history_row() {
        let pool = memory_pool().await;
        seed(&pool).await;
        let detail = create_order(&pool, draft(PaymentMethod::Cash)).await.unwrap();

        let updated = accept_order(&pool, detail.order.id, Some(99)).await.unwrap();
        assert_eq!(updated.status, OrderStatus::Accepted);

        let history = order_repo::find_history(&pool, detail.order.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].status, OrderStatus::Accepted);
        assert_eq!(history[1].actor_id, Some(99));
    }

    #[tokio::test]
    async fn illegal_transition_is_rejected_without_history() {
        let pool = memory_pool().await;
        seed(&pool).await;
        let detail = create_order(&pool, draft(PaymentMethod::Cash)).await.unwrap();

        let err = update_status(&pool, detail.order.id, OrderStatus::Delivering, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));

        let history = order_repo::find_history(&pool, detail.order.id).await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn rejecting_keeps_custom_note() {
        let pool = memory_pool().await;
        seed(&pool).await;
        let detail = create_order(&pool, draft(PaymentMethod::Cash)).await.unwrap();

        reject_order(&pool, detail.order.id, Some("المطعم مغلق".into()), None)
            .await
            .unwrap();
        let history = order_repo::find_history(&pool, detail.order.id).await.unwrap();
        assert_eq!(history[1].note, "المطعم مغلق");
    }

    #[tokio::test]
    async fn completion_settles_into_wallets() {
        let pool = memory_pool().await;
        seed(&pool).await;
        let detail = create_order(&pool, draft(PaymentMethod::Electronic)).await.unwrap();
        let id = detail.order.id;

        accept_order(&pool, id, None).await.unwrap();
        update_status(&pool, id, OrderStatus::Processing, None, None).await.unwrap();
        crate::dispatch::assign_driver(&pool, id, 20).await.unwrap();
        update_status(&pool, id, OrderStatus::Completed, None, None).await.unwrap();

        let vendor = wallet_repo::find_by_owner(&pool, OwnerType::Vendor, 10)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(vendor.balance, 60.0);

        // Driver is freed on completion
        let driver = actor::find_driver_by_id(&pool, 20).await.unwrap().unwrap();
        assert_eq!(driver.status, DriverStatus::Available);
    }

    #[tokio::test]
    async fn terminal_orders_cannot_move() {
        let pool = memory_pool().await;
        seed(&pool).await;
        let detail = create_order(&pool, draft(PaymentMethod::Cash)).await.unwrap();

        update_status(&pool, detail.order.id, OrderStatus::Cancelled, None, None)
            .await
            .unwrap();
        let err = accept_order(&pool, detail.order.id, None).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }
}
