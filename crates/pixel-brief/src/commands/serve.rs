//! Brief builder server command.

use std::path::Path;

use anyhow::Result;
use pixel_brief_server::BriefServer;

use crate::config::load_config;

/// Run the server.
pub async fn run(config_path: &Path, port: Option<u16>, open: bool) -> Result<()> {
    let mut config = load_config(config_path)?.server_config();
    if let Some(port) = port {
        config.port = port;
    }
    config.open = config.open && open;

    tracing::info!(
        "Starting brief builder on port {} with store {}",
        config.port,
        config.db_path.display()
    );

    BriefServer::new(config).start().await?;

    Ok(())
}
