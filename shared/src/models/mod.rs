//! Domain model vocabulary
//!
//! Closed enums for every status/kind field the dashboard used to compare as
//! free-text strings, plus the order transition table.

pub mod dispatch;
pub mod order;
pub mod rating;
pub mod wallet;

pub use dispatch::{DriverStatus, WaitingStatus};
pub use order::{OrderStatus, PaymentMethod};
pub use rating::{MAX_RATING, MIN_RATING, ParticipantRole, is_valid_rating};
pub use wallet::{OwnerType, PaymentType, TxStatus, TxType};
