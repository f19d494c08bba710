//! 核心模块 — configuration, state and the HTTP server
//!
//! - [`Config`] — env-driven server configuration
//! - [`ServerState`] — shared handler state (config + pool)
//! - [`Server`] — HTTP server lifecycle
//! - [`tasks`] — background workers

pub mod config;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
