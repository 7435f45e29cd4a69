// Configuration module entry point
// Built-in defaults overridable through SERVE_* environment variables

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ServeError;

// Re-export public types
pub use state::{AppState, INDEX_FILES};
pub use types::{Config, LoggingConfig, ServerConfig, ShutdownConfig};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const ENV_PREFIX: &str = "SERVE";

impl Config {
    /// Load configuration from defaults and the process environment.
    ///
    /// No configuration file is consulted. Nested keys use `__`, e.g.
    /// `SERVE_SERVER__PORT=9000` or `SERVE_ROOT=./public`.
    pub fn load() -> Result<Self, ServeError> {
        Self::load_from(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load configuration from defaults and the given environment source
    pub fn load_from(env: config::Environment) -> Result<Self, ServeError> {
        let settings = config::Config::builder()
            .add_source(
                env.prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", DEFAULT_PORT)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("shutdown.drain_timeout_secs", 10)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServeError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                ServeError::InvalidAddress(format!(
                    "{}:{}: {e}",
                    self.server.host, self.server.port
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_with(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::load_from(env_with(&[])).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.root, None);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.shutdown.drain_timeout_secs, 10);
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "0.0.0.0:8000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_env_overrides() {
        let cfg = Config::load_from(env_with(&[
            ("SERVE_SERVER__PORT", "9001"),
            ("SERVE_SERVER__HOST", "127.0.0.1"),
            ("SERVE_ROOT", "/srv/www"),
            ("SERVE_LOGGING__ACCESS_LOG", "false"),
        ]))
        .unwrap();
        assert_eq!(cfg.server.port, 9001);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.root.as_deref(), Some("/srv/www"));
        assert!(!cfg.logging.access_log);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let err = Config::load_from(env_with(&[("SERVE_SERVER__PORT", "not-a-port")]))
            .unwrap_err();
        assert!(matches!(err, ServeError::Config(_)));
    }

    #[test]
    fn test_invalid_host() {
        let mut cfg = Config::load_from(env_with(&[])).unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(matches!(
            cfg.get_socket_addr(),
            Err(ServeError::InvalidAddress(_))
        ));
    }
}
