//! HTTP server for fwagentd.

use crate::routes;
use anyhow::Result;
use axum::Router;
use fwagent_common::AgentConfig;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers.
pub struct AppState {
    pub config: AgentConfig,
    /// Serializes update/rollback runs: the engine assumes exclusive
    /// access to the store, the backup root and every destination, so
    /// only one run may be in flight.
    pub engine_lock: Mutex<()>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            engine_lock: Mutex::new(()),
            start_time: Instant::now(),
        }
    }
}

/// Run the HTTP server.
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.config.listen_addr.clone();
    let state = Arc::new(state);

    let app = Router::new()
        .merge(routes::health_routes())
        .merge(routes::media_routes())
        .merge(routes::firmware_routes())
        .merge(routes::power_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
