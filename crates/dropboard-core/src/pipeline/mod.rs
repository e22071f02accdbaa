//! Image ingestion pipeline components.
//!
//! - **source**: File handles from drops, pickers, or memory
//! - **discovery**: Find files under user-supplied paths
//! - **sniff**: Media type detection from magic bytes and extensions
//! - **decode**: Decode images with format detection and limits
//! - **thumbnail**: Generate WebP thumbnails
//! - **data_uri**: Encode display-ready `data:` URIs
//! - **hash**: BLAKE3 content hashes
//! - **ingest**: Orchestrates a batch and appends records in completion order

pub mod data_uri;
pub mod decode;
pub mod discovery;
pub mod hash;
pub mod ingest;
pub mod sniff;
pub mod source;
pub mod thumbnail;

// Re-exports for convenient access
pub use decode::{Decoded, DecodedImage, ImageDecoder};
pub use discovery::FileDiscovery;
pub use hash::Hasher;
pub use ingest::{append_as_completed, IngestEvent, Ingestor};
pub use source::{FileHandle, FileSource};
pub use thumbnail::ThumbnailGenerator;
