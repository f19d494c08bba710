//! Wasel Server — نواة سوق التوصيل متعدد البائعين
//!
//! Backend core of a multi-vendor delivery marketplace: order lifecycle,
//! driver dispatch, wallet ledger, payment settlement, ratings and payment
//! settings, served over an HTTP API.
//!
//! # Module structure
//!
//! ```text
//! wasel-server/src/
//! ├── core/          # Config, state, HTTP server, background tasks
//! ├── db/            # SQLite pool, models, repositories
//! ├── orders/        # Order lifecycle state machine
//! ├── dispatch/      # Driver assignment + waiting list
//! ├── wallet/        # Wallet ledger (balances, charges, withdrawals)
//! ├── settlement/    # Payment split calculator + plan application
//! ├── ratings/       # Rating collection and reports
//! ├── settings/      # Versioned payment settings
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Errors, logging, validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod dispatch;
pub mod orders;
pub mod ratings;
pub mod settings;
pub mod settlement;
pub mod utils;
pub mod wallet;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load .env, create the working directory and initialize logging.
///
/// Called once at startup before anything touches the config.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/wasel".into());
    std::fs::create_dir_all(&work_dir)?;

    let log_dir = format!("{work_dir}/logs");
    std::fs::create_dir_all(&log_dir)?;

    let level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(level.as_deref(), Some(&log_dir));
    Ok(())
}
