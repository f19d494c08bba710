//! Vendor and driver models

use serde::{Deserialize, Serialize};
use shared::DriverStatus;

/// البائع (merchant / store)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
    /// اسم المتجر — display name, NOT a lookup key (orders carry vendor_id)
    pub store_name: String,
    pub is_active: bool,
    pub created_at: i64,
}

/// السائق (delivery courier)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Driver {
    pub id: i64,
    pub name: String,
    pub status: DriverStatus,
    pub is_active: bool,
    pub created_at: i64,
}

/// Driver as shown in the assignment picker: busy drivers are listed but
/// flagged unselectable.
#[derive(Debug, Clone, Serialize)]
pub struct DriverCandidate {
    pub id: i64,
    pub name: String,
    pub status: DriverStatus,
    pub selectable: bool,
}

impl From<Driver> for DriverCandidate {
    fn from(d: Driver) -> Self {
        Self {
            id: d.id,
            name: d.name,
            selectable: d.status.is_selectable(),
            status: d.status,
        }
    }
}
