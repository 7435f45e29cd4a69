// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Directory to serve; the current working directory when unset
    #[serde(default)]
    pub root: Option<String>,
    pub logging: LoggingConfig,
    pub shutdown: ShutdownConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
}

/// Shutdown configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ShutdownConfig {
    /// Upper bound on waiting for in-flight connections after the interrupt
    pub drain_timeout_secs: u64,
}
