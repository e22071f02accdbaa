//! File handles: what a drop or a picker hands to the pipeline.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, IngestResult};

use super::sniff::{media_type_for_extension, sniff_media_type, SNIFF_LEN};

/// Where a file's bytes live.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// A file on disk, read when the pipeline gets to it
    Path(PathBuf),
    /// Bytes already in memory
    Bytes(Vec<u8>),
}

/// A file offered to the board, before acceptance or decoding.
#[derive(Debug, Clone)]
pub struct FileHandle {
    /// Display name (usually the file name)
    pub name: String,

    /// Media type declared by whoever produced the handle
    pub declared_type: Option<String>,

    /// Where to read the content from
    pub source: FileSource,
}

impl FileHandle {
    /// Handle for a file on disk. The media type is guessed from the extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let declared_type = media_type_for_extension(&path).map(str::to_string);
        Self {
            name,
            declared_type,
            source: FileSource::Path(path),
        }
    }

    /// Handle for in-memory bytes with an optional declared media type.
    pub fn from_bytes(
        name: impl Into<String>,
        declared_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.map(str::to_string),
            source: FileSource::Bytes(bytes),
        }
    }

    /// Media type used for acceptance: declared, else guessed from the name.
    pub fn media_type(&self) -> Option<String> {
        self.declared_type
            .clone()
            .or_else(|| media_type_for_extension(Path::new(&self.name)).map(str::to_string))
    }

    /// Media type detected from the first bytes of the content.
    ///
    /// Reads at most [`SNIFF_LEN`] bytes from disk; an unreadable file sniffs as `None`.
    pub fn sniffed_type(&self) -> Option<&'static str> {
        match &self.source {
            FileSource::Bytes(bytes) => sniff_media_type(&bytes[..bytes.len().min(SNIFF_LEN)]),
            FileSource::Path(path) => {
                use std::io::Read;

                let file = std::fs::File::open(path).ok()?;
                let mut header = Vec::with_capacity(SNIFF_LEN);
                file.take(SNIFF_LEN as u64).read_to_end(&mut header).ok()?;
                sniff_media_type(&header)
            }
        }
    }

    /// Lower-cased extension of the name, without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    /// Size in bytes, when known without reading the content.
    pub fn size_hint(&self) -> Option<u64> {
        match &self.source {
            FileSource::Path(path) => std::fs::metadata(path).ok().map(|m| m.len()),
            FileSource::Bytes(bytes) => Some(bytes.len() as u64),
        }
    }

    /// Read the full content, consuming the handle.
    pub async fn read(self) -> IngestResult<(String, Vec<u8>)> {
        match self.source {
            FileSource::Bytes(bytes) => Ok((self.name, bytes)),
            FileSource::Path(path) => match tokio::fs::read(&path).await {
                Ok(bytes) => Ok((self.name, bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(IngestError::FileNotFound(path))
                }
                Err(source) => Err(IngestError::Read {
                    name: self.name,
                    source,
                }),
            },
        }
    }
}
