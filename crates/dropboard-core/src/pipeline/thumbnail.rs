//! Thumbnail generation for grid display.

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

use crate::config::ThumbnailConfig;

use super::data_uri::to_data_uri;

/// Generates WebP thumbnails as data URIs.
pub struct ThumbnailGenerator {
    config: ThumbnailConfig,
}

impl ThumbnailGenerator {
    /// Create a new thumbnail generator with the given configuration.
    pub fn new(config: ThumbnailConfig) -> Self {
        Self { config }
    }

    /// Generate a thumbnail as a `data:image/webp;base64,...` URI.
    ///
    /// Returns `None` if thumbnails are disabled or encoding fails.
    pub fn generate(&self, image: &DynamicImage) -> Option<String> {
        self.generate_bytes(image)
            .map(|bytes| to_data_uri("image/webp", &bytes))
    }

    fn generate_bytes(&self, image: &DynamicImage) -> Option<Vec<u8>> {
        if !self.config.enabled {
            return None;
        }

        // Resize maintaining aspect ratio (longest edge = config.size)
        let thumbnail = image.thumbnail(self.config.size, self.config.size);

        let mut buffer = Cursor::new(Vec::new());
        if let Err(e) = thumbnail.write_to(&mut buffer, ImageFormat::WebP) {
            tracing::warn!("Thumbnail encode failed: {}", e);
            return None;
        }
        Some(buffer.into_inner())
    }

    /// Check if thumbnail generation is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}
