//! Rating vocabulary

use serde::{Deserialize, Serialize};

/// Lowest accepted star value
pub const MIN_RATING: i32 = 1;
/// Highest accepted star value
pub const MAX_RATING: i32 = 5;

/// Order participant roles that may rate or be rated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ParticipantRole {
    Customer,
    Vendor,
    Driver,
}

impl ParticipantRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ParticipantRole::Customer => "customer",
            ParticipantRole::Vendor => "vendor",
            ParticipantRole::Driver => "driver",
        }
    }
}

impl std::fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a star value is inside the accepted range
pub fn is_valid_rating(value: i32) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(is_valid_rating(1));
        assert!(is_valid_rating(5));
        assert!(!is_valid_rating(0));
        assert!(!is_valid_rating(6));
        assert!(!is_valid_rating(-1));
    }
}
