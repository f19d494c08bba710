//! Driver waiting-list model

use serde::{Deserialize, Serialize};
use shared::WaitingStatus;

/// Vendor-scoped queue entry for an order awaiting a driver
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WaitingListEntry {
    pub id: i64,
    pub order_id: i64,
    pub vendor_id: i64,
    pub status: WaitingStatus,
    pub created_at: i64,
    pub updated_at: i64,
}
