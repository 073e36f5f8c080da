//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::coordinator::{PageLimits, RetryPolicy};

/// Where games are kept.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageKind {
    /// Process memory; lost on exit.
    Memory,
    /// SQLite database file.
    #[default]
    Sqlite,
}

/// Configuration for the arena server.
///
/// Every key is optional in TOML; missing keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// Storage backend.
    #[serde(default)]
    storage: StorageKind,

    /// SQLite database path, used when `storage = "sqlite"`.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Attempts per move before reporting a conflict.
    #[serde(default = "default_max_move_attempts")]
    max_move_attempts: u32,

    /// Pause between move attempts, in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    retry_backoff_ms: u64,

    /// Page size when the client gives none.
    #[serde(default = "default_page_size")]
    default_page_size: u64,

    /// Largest page size a client may ask for.
    #[serde(default = "default_max_page_size")]
    max_page_size: u64,
}

#[instrument]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_port() -> u16 {
    3000
}

#[instrument]
fn default_db_path() -> String {
    "tictac_arena.db".to_string()
}

#[instrument]
fn default_max_move_attempts() -> u32 {
    RetryPolicy::DEFAULT_MAX_ATTEMPTS
}

#[instrument]
fn default_retry_backoff_ms() -> u64 {
    10
}

#[instrument]
fn default_page_size() -> u64 {
    20
}

#[instrument]
fn default_max_page_size() -> u64 {
    100
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            storage: StorageKind::default(),
            db_path: default_db_path(),
            max_move_attempts: default_max_move_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl ArenaConfig {
    /// Loads configuration from a TOML file and validates it.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(storage = %config.storage, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text and validates it.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the server cannot run with.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_move_attempts == 0 {
            return Err(ConfigError::new("max_move_attempts must be at least 1".to_string()));
        }
        if self.max_page_size == 0 {
            return Err(ConfigError::new("max_page_size must be at least 1".to_string()));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::new(format!(
                "default_page_size must be between 1 and {}, got {}",
                self.max_page_size, self.default_page_size
            )));
        }
        Ok(())
    }

    /// Overrides the bind host.
    pub fn with_host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    /// Overrides the bind port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Selects SQLite storage at `db_path`.
    pub fn with_db_path(mut self, db_path: String) -> Self {
        self.storage = StorageKind::Sqlite;
        self.db_path = db_path;
        self
    }

    /// Selects the storage backend.
    pub fn with_storage(mut self, storage: StorageKind) -> Self {
        self.storage = storage;
        self
    }

    /// Retry policy for moves.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_move_attempts, Duration::from_millis(self.retry_backoff_ms))
    }

    /// Page size bounds for listing.
    pub fn page_limits(&self) -> PageLimits {
        PageLimits::new(self.default_page_size, self.max_page_size)
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
