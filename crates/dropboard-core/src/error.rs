//! Error types for Dropboard.
//!
//! Errors are grouped by concern so callers can tell a bad config file from a
//! file that failed to decode or a drag that pointed outside the board.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Dropboard operations.
#[derive(Error, Debug)]
pub enum BoardError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Per-file ingestion errors
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Reorder contract violations
    #[error("Reorder error: {0}")]
    Reorder(#[from] ReorderError),

    /// A record with this id is already on the board
    #[error("Duplicate record id: {0}")]
    DuplicateId(String),

    /// The board task has shut down and no longer accepts commands
    #[error("Board is closed")]
    Closed,

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors for a single file on its way to becoming a record.
///
/// These never escape a batch: the ingestor logs them and moves on.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The file handle could not be read
    #[error("Read error for {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Image decoding failed
    #[error("Decode error for {name}: {message}")]
    Decode { name: String, message: String },

    /// File exceeds size limit
    #[error("File too large: {name} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        name: String,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {name} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        name: String,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Content is not a recognized image format
    #[error("Unsupported format for {name}: {format}")]
    UnsupportedFormat { name: String, format: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Errors raised when a move names a position the board does not have.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// Index is past the end of the sequence
    #[error("Index {index} out of range for board of length {len}")]
    OutOfRange { index: usize, len: usize },
}

/// Convenience type alias for Dropboard results.
pub type Result<T> = std::result::Result<T, BoardError>;

/// Convenience type alias for per-file ingestion results.
pub type IngestResult<T> = std::result::Result<T, IngestError>;
