// SPDX-License-Identifier: GPL-3.0-only
mod api;
mod config;
mod logging;
mod registry;
mod storage;
mod utils;

#[cfg(test)]
mod test_helpers;

use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use api::{ApiHandlers, HttpServer};
use config::{Cli, Config};
use logging::setup_logging;
use registry::{InMemoryRegistry, Registry};
use storage::{CacheDirStore, PhotoStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // File and environment first, flags win
    let config = Config::load()?.apply_cli(Cli::parse());

    setup_logging(&config.log_level, config.log_format)?;

    info!("Starting inventory-registry v{}", env!("CARGO_PKG_VERSION"));

    let registry: Arc<dyn Registry> = Arc::new(InMemoryRegistry::new());

    let store = CacheDirStore::new(&config.cache_dir).await?;
    info!(cache_dir = %store.dir().display(), static_dir = %config.static_dir.display(), "Storage initialized");
    let photos: Arc<dyn PhotoStore> = Arc::new(store);

    let handlers = ApiHandlers::new(registry, photos, config.static_dir.clone());
    let server = HttpServer::new(handlers, config.bind_addr(), config.max_upload_bytes);

    info!("Server running at {}/", config.origin());
    server.serve(shutdown_signal()).await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal (Ctrl+C)");
        }
        Err(err) => {
            error!(error = %err, "Unable to listen for shutdown signal");
            // Keep serving rather than exit on a broken signal handler
            std::future::pending::<()>().await;
        }
    }
}
