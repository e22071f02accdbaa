//! Core data types for Dropboard.
//!
//! An [`ImageRecord`] is what ends up on the board: a stable id plus the
//! decoded, display-ready content of one file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an image record (UUID v4).
///
/// Generated once at ingestion time and used as the render key, so a record
/// keeps its identity no matter where it is moved.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(uuid::Uuid);

impl ImageId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Short representation (first 8 characters of the UUID).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageId({})", self.short_id())
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display-ready content of a decoded image. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    /// `data:<media-type>;base64,...` URI of the original file bytes
    pub data_uri: String,

    /// Media type of the content ("image/png", "image/jpeg", ...)
    pub media_type: String,

    /// Image width in pixels; `None` for content shown as-is without a raster decode (SVG, AVIF, HEIF)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Image height in pixels; `None` alongside `width`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Size of the original file in bytes
    pub byte_len: u64,

    /// BLAKE3 hash of the original bytes
    pub content_hash: String,

    /// Downscaled WebP data URI for grid display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// One image on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Stable identity, assigned at ingestion
    pub id: ImageId,

    /// Name of the file this record came from
    pub file_name: String,

    /// Decoded content
    pub content: ImageContent,
}

impl ImageRecord {
    /// Build a record for freshly decoded content with a new id.
    pub fn new(file_name: impl Into<String>, content: ImageContent) -> Self {
        Self {
            id: ImageId::new(),
            file_name: file_name.into(),
            content,
        }
    }
}

/// Outcome of ingesting one batch of files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IngestReport {
    /// Files handed to the pipeline after filtering
    pub submitted: usize,

    /// Names of files the accept filter turned away
    pub rejected: Vec<String>,

    /// Ids appended to the board, in completion order
    pub appended: Vec<ImageId>,

    /// Files that produced no record
    pub failed: usize,

    /// Wall time for the whole batch in seconds
    pub total_seconds: f64,
}

impl IngestReport {
    /// Number of records the batch added to the board.
    pub fn appended_count(&self) -> usize {
        self.appended.len()
    }
}
