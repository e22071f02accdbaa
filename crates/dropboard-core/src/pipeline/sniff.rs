//! Media type detection from magic bytes and file extensions.

use std::path::Path;

/// Bytes of a file's head worth reading for [`sniff_media_type`].
pub const SNIFF_LEN: usize = 512;

/// Detect an image media type from the leading bytes of a file.
///
/// Binary formats need the first 12 bytes; SVG is only recognised when the
/// `<svg` root falls inside the given header.
/// Returns `None` when the header matches no known image signature.
pub fn sniff_media_type(header: &[u8]) -> Option<&'static str> {
    if header.len() < 4 {
        return None;
    }

    // JPEG: FF D8 FF
    if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }

    // PNG: 89 50 4E 47
    if header.starts_with(&[0x89, b'P', b'N', b'G']) {
        return Some("image/png");
    }

    // GIF: GIF8
    if header.starts_with(b"GIF8") {
        return Some("image/gif");
    }

    // WebP: RIFF....WEBP
    if header.starts_with(b"RIFF") {
        if header.len() >= 12 && &header[8..12] == b"WEBP" {
            return Some("image/webp");
        }
        return None;
    }

    // BMP: BM
    if header.starts_with(b"BM") {
        return Some("image/bmp");
    }

    // TIFF: II (little-endian) or MM (big-endian) followed by version 42
    if header.starts_with(&[b'I', b'I', 0x2A, 0x00]) || header.starts_with(&[b'M', b'M', 0x00, 0x2A])
    {
        return Some("image/tiff");
    }

    // ICO: 00 00 01 00
    if header.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
        return Some("image/x-icon");
    }

    // AVIF/HEIF: ftyp box at offset 4, brand at offset 8
    if header.len() >= 12 && &header[4..8] == b"ftyp" {
        return match &header[8..12] {
            b"avif" | b"avis" => Some("image/avif"),
            b"heic" | b"heix" | b"hevc" | b"mif1" | b"msf1" => Some("image/heif"),
            _ => None,
        };
    }

    // SVG: markup whose root element shows up in the header
    let text = header.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(header);
    let start = text.iter().position(|b| !b.is_ascii_whitespace())?;
    if text[start] == b'<' && text.windows(4).any(|w| w == b"<svg") {
        return Some("image/svg+xml");
    }

    None
}

/// Media types kept as the original bytes without a raster decode.
///
/// The board can show them, but `image` has no decoder for them.
pub fn is_passthrough(media_type: &str) -> bool {
    matches!(media_type, "image/svg+xml" | "image/avif" | "image/heif")
}

/// Guess an image media type from a path's extension (case-insensitive).
pub fn media_type_for_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let media_type = match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "heic" | "heif" => "image/heif",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(media_type)
}
