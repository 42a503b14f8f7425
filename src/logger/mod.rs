//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Subscriber setup from configuration
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//!
//! Everything is emitted through `tracing`. Access lines use the `access`
//! target so they can be filtered separately, e.g. `RUST_LOG=info,access=off`.

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use crate::assets::AssetStore;
use crate::config::Config;

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over `logging.level` when set. Should be called once at
/// application startup; later calls are ignored.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, assets: &AssetStore) {
    tracing::info!("FileKey listening on http://{addr}");
    tracing::info!(
        files = assets.len(),
        bytes = assets.total_bytes(),
        "Serving embedded asset bundle"
    );
    match config.server.workers {
        Some(workers) => tracing::info!("Worker threads: {workers}"),
        None => tracing::info!("Worker threads: default (CPU cores)"),
    }
    if let Some(max) = config.performance.max_connections {
        tracing::info!("Max connections: {max}");
    }
    tracing::debug!(paths = ?assets.paths(), "Bundle contents");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::warn!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

pub fn log_shutdown_started(in_flight: usize) {
    tracing::info!(in_flight, "Shutdown signal received, draining connections");
}

pub fn log_shutdown_complete(drained: bool) {
    if drained {
        tracing::info!("All connections closed, server stopped");
    } else {
        tracing::warn!("Shutdown timeout elapsed, abandoning remaining connections");
    }
}
