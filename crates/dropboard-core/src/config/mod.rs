//! Configuration management for Dropboard.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults for every missing section or key.

mod types;
mod validate;

pub use types::*;
pub use validate::MAX_FILE_SIZE_MB;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Dropboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ingestion settings
    pub ingest: IngestConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Thumbnail generation settings
    pub thumbnail: ThumbnailConfig,

    /// Board task settings
    pub board: BoardConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.dropboard.dropboard/config.toml
    /// - Linux: ~/.config/dropboard/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\dropboard\config\config.toml
    ///
    /// Falls back to ~/.dropboard/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "dropboard", "dropboard")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".dropboard").join("config.toml")
            })
    }

    /// Get the resolved default output path (with ~ expansion), if one is set.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output
            .path
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
