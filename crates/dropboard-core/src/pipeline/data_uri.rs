//! `data:` URI encoding for display-ready content.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Encode bytes as a `data:<media-type>;base64,<payload>` URI.
pub fn to_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, BASE64.encode(bytes))
}
