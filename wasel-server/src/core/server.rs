//! Server Implementation
//!
//! HTTP server startup, middleware layering, background tasks and graceful
//! shutdown.

use std::time::Duration;

use axum::http::StatusCode;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api;
use crate::core::{Config, ServerState, tasks};
use crate::utils::{AppError, AppResult};

/// HTTP Server
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Initialize state, start background workers and serve until ctrl-c.
    pub async fn run(&self) -> AppResult<()> {
        let state = ServerState::initialize(&self.config).await?;

        let shutdown = CancellationToken::new();
        let clearing = tasks::spawn_clearing_task(state.clone(), shutdown.clone());

        let app = api::router(state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_millis(self.config.request_timeout_ms),
            ))
            .layer(cors_layer(&self.config));

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
        info!(%addr, environment = %self.config.environment, "Wasel server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutting down...");
            })
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        shutdown.cancel();
        let _ = clearing.await;
        Ok(())
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.is_production() {
        CorsLayer::new()
    } else {
        CorsLayer::permissive()
    }
}
