//! Global configuration parsing and validation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{AppError, Result};

/// Which [`ListStore`](crate::persistence::ListStore) backend to open.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Durable `SQLite` file at [`GlobalConfig::db_path`].
    #[default]
    Sqlite,
    /// Process-scoped in-memory map; lost on restart.
    Memory,
}

/// Short list-id generation settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct IdConfig {
    /// Number of alphanumeric characters in a list id.
    #[serde(default = "default_id_length")]
    pub length: usize,
    /// Fresh ids tried before giving up on a collision streak.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            length: default_id_length(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_id_length() -> usize {
    5
}

fn default_max_attempts() -> u32 {
    8
}

fn default_http_host() -> String {
    "127.0.0.1".into()
}

fn default_http_port() -> u16 {
    5000
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data").join("todont.db")
}

/// Global configuration parsed from `config.toml`.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Interface the HTTP server binds to.
    #[serde(default = "default_http_host")]
    pub http_host: String,
    /// HTTP port; `0` asks the OS for an ephemeral port.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Storage backend selection.
    #[serde(default)]
    pub storage: StorageKind,
    /// `SQLite` database file used by the durable backend.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// List-id generation settings.
    #[serde(default)]
    pub ids: IdConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            http_host: default_http_host(),
            http_port: default_http_port(),
            storage: StorageKind::default(),
            db_path: default_db_path(),
            ids: IdConfig::default(),
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// `host:port` string handed to the TCP listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Check invariants that serde defaults cannot express.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.http_host.trim().is_empty() {
            return Err(AppError::Config("http_host must not be empty".into()));
        }
        if !(4..=32).contains(&self.ids.length) {
            return Err(AppError::Config(format!(
                "ids.length must be between 4 and 32, got {}",
                self.ids.length
            )));
        }
        if self.ids.max_attempts == 0 {
            return Err(AppError::Config("ids.max_attempts must be at least 1".into()));
        }
        if self.storage == StorageKind::Sqlite && self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("db_path must not be empty".into()));
        }
        Ok(())
    }
}
