//! Logger module
//!
//! Provides logging utilities for the server:
//! - Subscriber setup from configuration
//! - Server lifecycle logging
//! - Access logging in Common Log Format
//! - Error and warning logging

mod format;

pub use format::{version_token, AccessLogEntry};

use crate::config::Config;
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`. Calling this twice is
/// harmless; the second subscriber is ignored.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init();
}

pub fn log_server_start(addr: &SocketAddr, root: &Path, config: &Config) {
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Serving directory: {}", root.display());
    match config.server.workers {
        Some(workers) => tracing::debug!("Worker threads: {workers}"),
        None => tracing::debug!("Worker threads: default (CPU cores)"),
    }
    if !config.logging.access_log {
        tracing::debug!("Access log disabled");
    }
}

pub fn log_shutdown_requested(signal: &str) {
    tracing::info!("{signal} received, no longer accepting connections");
}

pub fn log_drain_complete() {
    tracing::debug!("All connections closed");
}

pub fn log_drain_timeout(secs: u64) {
    tracing::warn!("Connections still open after {secs}s, exiting anyway");
}

pub fn log_connection_error(err: &hyper::Error) {
    if err.is_incomplete_message() {
        tracing::debug!("Connection closed mid-request: {err}");
    } else {
        tracing::warn!("Failed to serve connection: {err}");
    }
}

pub fn log_accept_error(err: &std::io::Error) {
    tracing::error!("Failed to accept connection: {err}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry) {
    tracing::info!(target: "access", "{}", entry.format_common());
}
