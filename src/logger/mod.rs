//! Logger module
//!
//! Provides logging utilities for the edge handler including:
//! - Subscriber setup from configuration
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//!
//! Everything is emitted through `tracing`; access lines go to the `access` target
//! so they can be filtered separately (`RUST_LOG=access=off`).

mod format;

pub use format::AccessLogEntry;

use crate::config::{AppState, Config};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over `logging.level` when set. Should be called once at startup.
pub fn init(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
}

pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    let config = &state.config;
    tracing::info!("======================================");
    tracing::info!("Edge handler started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Upstream: {}", state.upstream.base_url());
    tracing::info!("Rewriting origin: {}", state.rewriter.upstream_origin());
    match config.proxy.public_origin.as_deref() {
        Some(origin) => tracing::info!("Public origin: {origin}"),
        None => tracing::info!("Public origin: derived from request headers"),
    }
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    tracing::info!("Upload limit: {} bytes", config.upstream.max_upload_bytes);
    tracing::info!("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log a request that ended in an error envelope
pub fn log_request_failure(method: &str, path: &str, status: u16, message: &str) {
    if status >= 500 {
        tracing::error!(method, path, status, "{message}");
    } else {
        tracing::warn!(method, path, status, "{message}");
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

pub fn log_shutdown_requested(signal: &str) {
    tracing::info!("[SIGNAL] {signal} received, stopping accept loop");
}
