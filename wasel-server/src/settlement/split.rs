//! Payment Split Calculator
//!
//! Pure module: given an order and the current payment settings, produce the
//! list of wallet postings that settle it. Nothing here touches the database;
//! the settlement service applies the plan transactionally.
//!
//! All arithmetic is done in `Decimal` and rounded to 2dp per posting.

use crate::db::models::{Order, PaymentSettings};
use rust_decimal::Decimal;
use shared::money::{to_decimal, to_money};
use shared::{OwnerType, PaymentMethod, PaymentType, TxStatus, TxType};

/// One wallet posting of a settlement plan. `amount` is always positive;
/// `tx_type` carries the direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub owner_type: OwnerType,
    pub owner_id: i64,
    pub amount: f64,
    pub tx_type: TxType,
    pub payment_type: PaymentType,
    pub status: TxStatus,
    pub description: String,
}

/// Settlement plan for one completed order
#[derive(Debug, Clone, Default)]
pub struct SettlementPlan {
    pub postings: Vec<Posting>,
}

/// Build the settlement plan for a completed order.
///
/// With total T = subtotal P + delivery fee D:
/// - **cash**: the driver collected T face-to-face, so vendor +P and
///   driver +D are recorded *pending* until the collection clears.
/// - **electronic**: funds already reached the platform; vendor +P and
///   driver +D post as completed.
/// - **wallet**: the vendor is paid T from platform funds and the driver
///   owes T back (they collected D in person and keep it); the driver
///   debit may overdraw.
/// - Commission C% applies per side when the matching auto flag is on:
///   C%·P against the vendor, C%·D against the driver.
pub fn build_plan(order: &Order, settings: &PaymentSettings) -> SettlementPlan {
    let subtotal = to_decimal(order.subtotal);
    let delivery_fee = to_decimal(order.delivery_fee);
    let total = to_decimal(order.total_amount);

    let driver_id = match order.driver_id {
        Some(id) => id,
        // No driver means nothing was delivered; the lifecycle manager
        // never completes such an order, but an empty plan is the safe answer
        None => return SettlementPlan::default(),
    };

    let mut postings = Vec::new();
    let mut push = |owner_type: OwnerType,
                    owner_id: i64,
                    amount: Decimal,
                    tx_type: TxType,
                    payment_type: PaymentType,
                    status: TxStatus,
                    description: String| {
        let amount = to_money(amount);
        if amount > 0.0 {
            postings.push(Posting {
                owner_type,
                owner_id,
                amount,
                tx_type,
                payment_type,
                status,
                description,
            });
        }
    };

    match order.payment_method {
        PaymentMethod::Cash => {
            push(
                OwnerType::Vendor,
                order.vendor_id,
                subtotal,
                TxType::Credit,
                PaymentType::Cash,
                TxStatus::Pending,
                format!("حصة البائع من الطلب #{} (نقدي)", order.id),
            );
            push(
                OwnerType::Driver,
                driver_id,
                delivery_fee,
                TxType::Credit,
                PaymentType::Cash,
                TxStatus::Pending,
                format!("رسوم توصيل الطلب #{} (نقدي)", order.id),
            );
        }
        PaymentMethod::Electronic => {
            push(
                OwnerType::Vendor,
                order.vendor_id,
                subtotal,
                TxType::Credit,
                PaymentType::Electronic,
                TxStatus::Completed,
                format!("حصة البائع من الطلب #{} (إلكتروني)", order.id),
            );
            push(
                OwnerType::Driver,
                driver_id,
                delivery_fee,
                TxType::Credit,
                PaymentType::Electronic,
                TxStatus::Completed,
                format!("رسوم توصيل الطلب #{} (إلكتروني)", order.id),
            );
        }
        PaymentMethod::Wallet => {
            // Platform-internal transfer, recorded as electronic movement
            push(
                OwnerType::Vendor,
                order.vendor_id,
                total,
                TxType::Credit,
                PaymentType::Electronic,
                TxStatus::Completed,
                format!("قيمة الطلب #{} (محفظة)", order.id),
            );
            push(
                OwnerType::Driver,
                driver_id,
                total,
                TxType::Debit,
                PaymentType::Electronic,
                TxStatus::Completed,
                format!("خصم قيمة الطلب #{} (محفظة)", order.id),
            );
        }
    }

    let rate = to_decimal(settings.delivery_commission_percent) / Decimal::ONE_HUNDRED;
    if rate > Decimal::ZERO {
        if settings.auto_charge_vendor {
            push(
                OwnerType::Vendor,
                order.vendor_id,
                subtotal * rate,
                TxType::Debit,
                PaymentType::Commission,
                TxStatus::Completed,
                format!("عمولة المنصة عن الطلب #{}", order.id),
            );
        }
        if settings.auto_deduct_from_driver {
            push(
                OwnerType::Driver,
                driver_id,
                delivery_fee * rate,
                TxType::Debit,
                PaymentType::Commission,
                TxStatus::Completed,
                format!("عمولة التوصيل عن الطلب #{}", order.id),
            );
        }
    }

    SettlementPlan { postings }
}
