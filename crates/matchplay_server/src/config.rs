//! Server configuration.

use std::collections::BTreeMap;
use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Top-level server configuration, loaded from TOML.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// Match persistence.
    #[serde(default)]
    store: StoreConfig,

    /// Live event fan-out.
    #[serde(default)]
    broadcast: BroadcastConfig,

    /// Move processing.
    #[serde(default)]
    moves: MoveConfig,

    /// Caller identity.
    #[serde(default)]
    auth: AuthConfig,
}

/// Which store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreBackend {
    /// Process memory; matches are lost on restart.
    #[default]
    Memory,
    /// SQLite database file.
    Sqlite,
}

/// Store settings.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend kind.
    #[serde(default)]
    backend: StoreBackend,

    /// Database path for the SQLite backend.
    #[serde(default = "default_db_path")]
    path: String,
}

/// Broadcast settings.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct BroadcastConfig {
    /// Events buffered per subscriber before it lags.
    #[serde(default = "default_capacity")]
    capacity: usize,
}

/// Move processing settings.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct MoveConfig {
    /// Read-validate-write attempts before reporting a conflict.
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,
}

/// Identity settings.
#[derive(Debug, Clone, Default, Getters, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token to user id.
    #[serde(default)]
    tokens: BTreeMap<String, String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "matchplay.db".to_string()
}

fn default_capacity() -> usize {
    64
}

fn default_max_attempts() -> u32 {
    matchplay::DEFAULT_MAX_ATTEMPTS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_db_path(),
        }
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store: StoreConfig::default(),
            broadcast: BroadcastConfig::default(),
            moves: MoveConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(
            host = %config.host,
            port = config.port,
            backend = %config.store.backend,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Registers a bearer token for a user.
    pub fn with_token(mut self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.auth.tokens.insert(token.into(), user_id.into());
        self
    }

    /// Returns `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
