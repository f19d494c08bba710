//! Driver dispatch vocabulary

use serde::{Deserialize, Serialize};

/// Waiting-list entry lifecycle.
///
/// At most one `Pending` entry may exist per order (enforced by a partial
/// unique index in storage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum WaitingStatus {
    Pending,
    Matched,
    Cancelled,
}

/// حالة السائق
///
/// `Busy` drivers are listed but never selectable for assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum DriverStatus {
    Available,
    Busy,
    Offline,
}

impl DriverStatus {
    /// Whether a driver in this state may take a new order
    pub fn is_selectable(self) -> bool {
        matches!(self, DriverStatus::Available)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DriverStatus::Available => "available",
            DriverStatus::Busy => "busy",
            DriverStatus::Offline => "offline",
        }
    }
}

impl std::fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_available_drivers_are_selectable() {
        assert!(DriverStatus::Available.is_selectable());
        assert!(!DriverStatus::Busy.is_selectable());
        assert!(!DriverStatus::Offline.is_selectable());
    }

    #[test]
    fn driver_status_displays_its_wire_form() {
        assert_eq!(DriverStatus::Available.as_str(), "available");
        assert_eq!(format!("{}", DriverStatus::Busy), "busy");
        assert_eq!(DriverStatus::Offline.to_string(), "offline");
    }
}
