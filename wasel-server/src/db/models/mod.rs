//! Database Models

// Actors
pub mod actor;

// Orders
pub mod order;

// Dispatch
pub mod waiting_list;

// Wallets
pub mod wallet;

// Ratings
pub mod rating;

// Configuration and reporting
pub mod settings;
pub mod stats;

// Re-exports
pub use actor::{Driver, DriverCandidate, Vendor};
pub use order::{Order, OrderCreate, OrderDetail, OrderItem, OrderItemCreate, StatusHistoryEntry};
pub use rating::{MonthlyRatingRow, Rating, RatingCreate, RatingStats};
pub use settings::{PaymentSettings, PaymentSettingsPatch};
pub use stats::{FinancialSummary, MethodRevenueRow};
pub use waiting_list::WaitingListEntry;
pub use wallet::{Wallet, WalletBalance, WalletTransaction};
