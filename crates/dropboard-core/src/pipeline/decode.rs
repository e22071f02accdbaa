//! Image decoding with content-based format detection and size limits.

use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::config::LimitsConfig;
use crate::error::IngestError;

use super::sniff::{is_passthrough, sniff_media_type, SNIFF_LEN};

/// Image decoder with configurable limits.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Media type matching the detected format
    pub media_type: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// What decoding produced for one file.
pub enum Decoded {
    /// Pixels are available (dimensions, thumbnail)
    Raster(DecodedImage),
    /// Recognised content the board shows from the original bytes as-is
    Passthrough { media_type: &'static str },
}

impl Decoded {
    /// Media type of the decoded content.
    pub fn media_type(&self) -> &str {
        match self {
            Decoded::Raster(image) => image.media_type.as_str(),
            Decoded::Passthrough { media_type } => *media_type,
        }
    }
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Largest accepted file in bytes.
    pub fn max_file_bytes(&self) -> u64 {
        self.limits.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Fail with `FileTooLarge` when `len` bytes exceed the configured limit.
    pub fn check_file_size(&self, name: &str, len: u64) -> Result<(), IngestError> {
        if len > self.max_file_bytes() {
            return Err(IngestError::FileTooLarge {
                name: name.to_string(),
                size_mb: len / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }
        Ok(())
    }

    /// Decode an in-memory file on the blocking pool.
    ///
    /// The pixel decode runs in `spawn_blocking` so the caller's task only
    /// waits on this one file. There is no timeout: a started decode always
    /// runs to completion. SVG, AVIF and HEIF content is recognised by its
    /// header and passed through without a pixel decode.
    pub async fn decode_from_bytes(
        &self,
        name: &str,
        bytes: Vec<u8>,
    ) -> Result<(Decoded, Vec<u8>), IngestError> {
        self.check_file_size(name, bytes.len() as u64)?;

        let sniffed = sniff_media_type(&bytes[..bytes.len().min(SNIFF_LEN)]);
        if let Some(media_type) = sniffed.filter(|m| is_passthrough(m)) {
            tracing::debug!("Passing {:?} through as {}", name, media_type);
            return Ok((Decoded::Passthrough { media_type }, bytes));
        }

        let name_owned = name.to_string();
        let (decoded, bytes) = tokio::task::spawn_blocking(move || {
            let decoded = Self::decode_bytes_sync(&bytes, &name_owned, sniffed);
            decoded.map(|d| (d, bytes))
        })
        .await
        .map_err(|e| IngestError::Decode {
            name: name.to_string(),
            message: format!("Task join error: {}", e),
        })??;

        if decoded.width > self.limits.max_image_dimension
            || decoded.height > self.limits.max_image_dimension
        {
            return Err(IngestError::ImageTooLarge {
                name: name.to_string(),
                width: decoded.width,
                height: decoded.height,
                max_dim: self.limits.max_image_dimension,
            });
        }
        Ok((Decoded::Raster(decoded), bytes))
    }

    /// Synchronous decode from bytes (runs in spawn_blocking).
    fn decode_bytes_sync(
        bytes: &[u8],
        name: &str,
        sniffed: Option<&'static str>,
    ) -> Result<DecodedImage, IngestError> {
        use std::io::Cursor;

        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| IngestError::Decode {
                name: name.to_string(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = reader.format().ok_or_else(|| IngestError::UnsupportedFormat {
            name: name.to_string(),
            format: std::path::Path::new(name)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        })?;
        let image = reader.decode().map_err(|e| IngestError::Decode {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        let media_type = sniffed.unwrap_or_else(|| format.to_mime_type()).to_string();
        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            image,
            format,
            media_type,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn raster(decoded: Decoded) -> DecodedImage {
        match decoded {
            Decoded::Raster(image) => image,
            Decoded::Passthrough { media_type } => panic!("unexpected passthrough {media_type}"),
        }
    }

    #[tokio::test]
    async fn test_decode_png() {
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let (decoded, bytes) = decoder
            .decode_from_bytes("a.png", png_bytes(8, 4))
            .await
            .unwrap();
        let decoded = raster(decoded);
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!(decoded.media_type, "image/png");
        assert_eq!((decoded.width, decoded.height), (8, 4));
        assert!(!bytes.is_empty());
    }

    #[tokio::test]
    async fn test_format_detected_by_content() {
        // PNG bytes under a .jpg name are still a PNG.
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let (decoded, _) = decoder
            .decode_from_bytes("misnamed.jpg", png_bytes(2, 2))
            .await
            .unwrap();
        let decoded = raster(decoded);
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!(decoded.media_type, "image/png");
    }

    #[tokio::test]
    async fn test_garbage_is_rejected() {
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let result = decoder
            .decode_from_bytes("junk.png", b"definitely not an image".to_vec())
            .await;
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedFormat { .. }) | Err(IngestError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_truncated_png_is_decode_error() {
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let mut bytes = png_bytes(16, 16);
        bytes.truncate(20);
        let result = decoder.decode_from_bytes("cut.png", bytes).await;
        assert!(matches!(result, Err(IngestError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_dimension_limit() {
        let limits = LimitsConfig {
            max_image_dimension: 10,
            ..LimitsConfig::default()
        };
        let decoder = ImageDecoder::new(limits);
        let result = decoder.decode_from_bytes("big.png", png_bytes(11, 2)).await;
        assert!(matches!(result, Err(IngestError::ImageTooLarge { width: 11, .. })));
    }

    #[tokio::test]
    async fn test_svg_passes_through() {
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"/>"#.to_vec();
        let (decoded, bytes) = decoder.decode_from_bytes("logo.svg", svg.clone()).await.unwrap();
        assert!(matches!(decoded, Decoded::Passthrough { media_type: "image/svg+xml" }));
        assert_eq!(decoded.media_type(), "image/svg+xml");
        assert_eq!(bytes, svg);
    }

    #[tokio::test]
    async fn test_avif_passes_through() {
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let mut avif = vec![0, 0, 0, 0x1C, b'f', b't', b'y', b'p', b'a', b'v', b'i', b'f'];
        avif.extend_from_slice(&[0u8; 32]);
        let (decoded, _) = decoder.decode_from_bytes("photo.avif", avif).await.unwrap();
        assert_eq!(decoded.media_type(), "image/avif");
    }

    #[tokio::test]
    async fn test_svg_name_with_garbage_still_fails() {
        let decoder = ImageDecoder::new(LimitsConfig::default());
        let result = decoder
            .decode_from_bytes("logo.svg", b"\x00\x01 not markup at all".to_vec())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_file_size_limit() {
        let limits = LimitsConfig {
            max_file_size_mb: 1,
            ..LimitsConfig::default()
        };
        let decoder = ImageDecoder::new(limits);
        assert!(decoder.check_file_size("ok.png", 1024 * 1024).is_ok());
        let result = decoder
            .decode_from_bytes("huge.png", vec![0u8; 1024 * 1024 + 1])
            .await;
        assert!(matches!(result, Err(IngestError::FileTooLarge { max_mb: 1, .. })));
    }

    #[test]
    fn test_huge_size_limit_saturates() {
        let limits = LimitsConfig {
            max_file_size_mb: u64::MAX / 1024,
            ..LimitsConfig::default()
        };
        let decoder = ImageDecoder::new(limits);
        assert_eq!(decoder.max_file_bytes(), u64::MAX);
        assert!(decoder.check_file_size("any.png", u64::MAX).is_ok());
    }
}
