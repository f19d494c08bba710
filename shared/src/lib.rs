//! Shared types for the Wasel marketplace core
//!
//! Domain vocabulary used across crates: order/payment/wallet enums with
//! their transition rules, money arithmetic helpers, and ID/time utilities.

pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use models::{
    DriverStatus, OrderStatus, OwnerType, ParticipantRole, PaymentMethod, PaymentType, TxStatus,
    TxType, WaitingStatus, is_valid_rating,
};
pub use serde::{Deserialize, Serialize};
