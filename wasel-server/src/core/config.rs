/// 服务器配置 — all settings come from environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/wasel | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | DATABASE_PATH | {WORK_DIR}/wasel.db | SQLite database file |
/// | REQUEST_TIMEOUT_MS | 30000 | Per-request timeout |
/// | PENDING_CLEARING_HOURS | 24 | Delay before pending funds clear |
/// | CLEARING_INTERVAL_SECS | 300 | How often the clearing task runs |
/// | ENVIRONMENT | development | development \| staging \| production |
///
/// Business payment rules (commission, per-method switches) are NOT here;
/// they live in the versioned `payment_settings` record.
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub database_path: String,
    pub request_timeout_ms: u64,
    /// How long order funds stay pending before clearing into the
    /// available balance
    pub pending_clearing_hours: u64,
    pub clearing_interval_secs: u64,
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// documented defaults.
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/wasel".into());
        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| format!("{work_dir}/wasel.db"));
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path,
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            pending_clearing_hours: std::env::var("PENDING_CLEARING_HOURS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(24),
            clearing_interval_secs: std::env::var("CLEARING_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            work_dir,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Pending clearing delay in milliseconds
    pub fn clearing_delay_ms(&self) -> i64 {
        (self.pending_clearing_hours as i64) * 3_600_000
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
