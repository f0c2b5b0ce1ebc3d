//! Configuration for geotrace
//!
//! Built once at process start and handed to each component at
//! construction. Every field has a default, so an empty TOML document is a
//! complete configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// System-wide configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeotraceConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Event store settings
    pub store: StoreConfig,
    /// Geolocation oracle settings
    pub oracle: OracleConfig,
    /// Operator credential and token settings
    pub auth: AuthConfig,
}

impl GeotraceConfig {
    /// Parse a configuration from a TOML string
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the server binds to
    pub bind_addr: String,
    /// Require a bearer token for history retrieval
    pub require_auth: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            require_auth: true,
        }
    }
}

/// Event store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("forensics.db"),
        }
    }
}

/// Geolocation oracle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Base URL of the IP geolocation service
    pub base_url: String,
    /// Upper bound on a single lookup in milliseconds
    pub timeout_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://ip-api.com".to_string(),
            timeout_ms: 5_000,
        }
    }
}

/// Operator identity and token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Operator username
    pub username: String,
    /// Operator password
    pub password: String,
    /// HMAC signing secret for access tokens
    pub secret: String,
    /// Absolute token validity in minutes
    pub token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "cyber123".to_string(),
            secret: "geotrace-operator-signing-key".to_string(),
            token_ttl_minutes: 120,
        }
    }
}
