//! Host configuration loaded from a TOML file.
//!
//! The file has a `[server]` table for the listener and a `[search]` table
//! passed through to [`shop_search::SearchConfig`]. A missing file means
//! defaults.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use shop_search::SearchConfig;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SHOPAPI_CONFIG";

/// Environment variable overriding `search.api_key`.
pub const API_KEY_ENV: &str = "SERPAPI_KEY";

/// Top-level host configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub search: SearchConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind. `0` picks a free port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| AppError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Save configuration to a TOML file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("failed to serialize config: {e}")))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Resolve and load the host configuration.
    ///
    /// Path precedence: `explicit` (first CLI argument), then
    /// [`CONFIG_PATH_ENV`], then [`default_config_path`]. A missing file at
    /// the default location yields defaults; a missing explicit file is an
    /// error. [`API_KEY_ENV`] overrides the file's API key when non-blank.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be parsed, or if the
    /// resulting search configuration is invalid.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self> {
        let explicit = explicit.or_else(|| {
            std::env::var_os(CONFIG_PATH_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        });

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => {
                    tracing::debug!("no config file found; using defaults");
                    Self::default()
                }
            },
        };

        config.apply_api_key(std::env::var(API_KEY_ENV).ok());
        config.search.validate()?;
        Ok(config)
    }

    /// Replace the search API key with `key` when it is non-blank.
    pub fn apply_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.search.api_key = Some(key);
        }
    }
}

/// Default config file location: `<config dir>/shopapi/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("shopapi").join("config.toml"))
}
