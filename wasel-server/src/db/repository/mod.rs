//! Repository Module
//!
//! Plain async functions over the SQLite pool. Mutations that must be atomic
//! with other writes take `&mut SqliteConnection` so callers can run them
//! inside one transaction; standalone reads take `&SqlitePool`.

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

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
