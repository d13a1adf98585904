//! fwagentd - firmware maintenance daemon.
//!
//! Serves the appliance maintenance API: removable media discovery,
//! manifest-driven firmware updates with backup and rollback, and
//! operator-confirmed power control.

use anyhow::Result;
use fwagent_common::config::{AgentConfig, DEFAULT_CONFIG_PATH};
use fwagentd::server::{self, AppState};
use std::path::Path;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("fwagentd v{} starting", env!("CARGO_PKG_VERSION"));

    let config = AgentConfig::load(Path::new(DEFAULT_CONFIG_PATH));
    std::fs::create_dir_all(&config.data_dir)?;
    std::fs::create_dir_all(config.backup_root())?;

    server::run(AppState::new(config)).await
}
