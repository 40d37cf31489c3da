//! Server configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. `shortpress.toml` in the working directory, if present
//! 3. environment variables prefixed `SHORTPRESS__`, with `__` between
//!    nested keys (`SHORTPRESS__RESOLVER__MAX_DEPTH=16`)

use std::net::SocketAddr;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use shortpress_application::ResolverConfig;

use crate::error::ServerError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Runtime settings for the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// JSON snapshot file. Without one the store lives only in memory.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Username of the admin created at startup when none exists.
    #[serde(default)]
    pub bootstrap_admin: Option<String>,
    /// Resolver limits.
    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_file: None,
            bootstrap_admin: None,
            resolver: ResolverConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads `shortpress.toml` and the `SHORTPRESS__` environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("shortpress")
    }

    /// Loads configuration from `file` (extension optional) plus the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value has the wrong type.
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("SHORTPRESS")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns the address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Address` if `host` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(SocketAddr::new(self.host.parse()?, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let missing = dir.path().join("absent");
        let config = ServerConfig::load_from(missing.to_str().expect("utf-8 path"))
            .expect("Should load defaults");

        assert_eq!(config.port, 8080);
        assert_eq!(config.resolver.max_depth, 32);
        assert_eq!(config.data_file, None);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "port = 9090\nbootstrap_admin = \"root\"\n\n[resolver]\nmax_depth = 8\n",
        )
        .expect("Should write config");

        let config =
            ServerConfig::load_from(path.to_str().expect("utf-8 path")).expect("Should load");
        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.bootstrap_admin.as_deref(), Some("root"));
        assert_eq!(config.resolver.max_depth, 8);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..ServerConfig::default()
        };
        let addr = config.socket_addr().expect("Should parse");
        assert_eq!(addr.to_string(), "127.0.0.1:3000");

        let bad = ServerConfig {
            host: "not an address".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(bad.socket_addr(), Err(ServerError::Address(_))));
    }
}
