//! Service Configuration
//!
//! JSON configuration file for the service. Every field has a default, so an
//! empty object (or a missing file) yields a runnable configuration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Default `tracing` filter when `RUST_LOG` is unset (default: "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit logs as JSON lines (default: true)
    #[serde(default = "default_log_json")]
    pub log_json: bool,

    /// Snapshot file for the in-memory store; no persistence when unset
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_log_json() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            log_filter: default_log_filter(),
            log_json: default_log_json(),
            data_file: None,
        }
    }
}

impl ServiceConfig {
    /// Create a default config listening on `port`
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Load and validate configuration from `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ServiceConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file means defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be > 0".to_string()));
        }
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.socket_addr(), "0.0.0.0:8000");
        assert!(config.cors_origins.is_empty());
        assert!(config.data_file.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.json");
        fs::write(&path, r#"{"port": 9001, "data_file": "store.json"}"#).unwrap();

        let config = ServiceConfig::load(&path).unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.data_file, Some(PathBuf::from("store.json")));
        assert!(config.log_json);
    }

    #[test]
    fn test_rejects_port_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.json");
        fs::write(&path, r#"{"port": 0}"#).unwrap();

        assert!(matches!(
            ServiceConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = ServiceConfig::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }
}
