//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Accepted media types, in HTML `accept` syntax
    /// (e.g. `"image/*"` or `"image/png, image/jpeg, .webp"`)
    pub accept: String,

    /// Maximum decodes in flight at once
    pub max_concurrent_decodes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            accept: "image/*".to_string(),
            max_concurrent_decodes: 8,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 50,
            max_image_dimension: 16384,
        }
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Whether to generate thumbnails
    pub enabled: bool,

    /// Thumbnail size in pixels (longest edge)
    pub size: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 200,
        }
    }
}

/// Board task settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Commands buffered ahead of the board task
    pub command_buffer: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self { command_buffer: 64 }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,

    /// Default file to write the board to (supports `~`); stdout when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
            path: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
