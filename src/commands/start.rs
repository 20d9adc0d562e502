use anyhow::Result;
use jagad::{config, server};
use std::path::Path;
use tracing::info;

/// Execute the start command: load configuration and run the server until
/// shutdown.
pub async fn execute(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;

    info!(config = %config_path.display(), "Configuration loaded");

    server::start_server(cfg).await
}
