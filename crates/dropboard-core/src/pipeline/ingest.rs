//! Ingestion: decodes a batch of file handles and appends each record to the
//! board as soon as it is ready.
//!
//! Records land in *completion* order, not submission order. A small file
//! dropped after a large one can finish first and take the earlier slot.
//! Files that fail to read or decode produce no record; the failure is logged
//! and counted and the rest of the batch carries on. Each file gets exactly
//! one attempt.

use futures_util::stream::{self, StreamExt};
use std::future::Future;
use std::time::Instant;

use crate::board::BoardHandle;
use crate::config::Config;
use crate::error::{IngestError, IngestResult, Result};
use crate::types::{ImageContent, ImageId, ImageRecord, IngestReport};

use super::data_uri::to_data_uri;
use super::decode::{Decoded, ImageDecoder};
use super::hash::Hasher;
use super::source::FileHandle;
use super::thumbnail::ThumbnailGenerator;

/// What happened to one file of a batch.
#[derive(Debug)]
pub enum IngestEvent {
    /// The file became a record at `index`
    Appended {
        name: String,
        id: ImageId,
        index: usize,
    },
    /// The file produced no record
    Failed { name: String, error: IngestError },
}

/// Turns file handles into image records.
pub struct Ingestor {
    decoder: ImageDecoder,
    thumbnail_gen: ThumbnailGenerator,
    max_concurrent: usize,
}

impl Ingestor {
    /// Create a new ingestor with the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            decoder: ImageDecoder::new(config.limits.clone()),
            thumbnail_gen: ThumbnailGenerator::new(config.thumbnail.clone()),
            max_concurrent: config.ingest.max_concurrent_decodes.max(1),
        }
    }

    /// Read and decode one file into a record with a fresh id.
    pub async fn prepare(&self, handle: FileHandle) -> IngestResult<ImageRecord> {
        let start = Instant::now();
        if let Some(len) = handle.size_hint() {
            self.decoder.check_file_size(&handle.name, len)?;
        }
        let (name, bytes) = handle.read().await?;
        tracing::trace!("  Read {:?}: {:?}", name, start.elapsed());

        let decode_start = Instant::now();
        let (decoded, bytes) = self.decoder.decode_from_bytes(&name, bytes).await?;
        tracing::trace!("  Decode {:?}: {:?}", name, decode_start.elapsed());

        let (width, height, thumbnail) = match &decoded {
            Decoded::Raster(image) => (
                Some(image.width),
                Some(image.height),
                self.thumbnail_gen.generate(&image.image),
            ),
            Decoded::Passthrough { .. } => (None, None, None),
        };
        let content = ImageContent {
            data_uri: to_data_uri(decoded.media_type(), &bytes),
            media_type: decoded.media_type().to_string(),
            width,
            height,
            byte_len: bytes.len() as u64,
            content_hash: Hasher::content_hash(&bytes),
            thumbnail,
        };

        match (width, height) {
            (Some(w), Some(h)) => tracing::debug!(
                "Decoded {:?} in {:?} ({}x{}, {})",
                name,
                start.elapsed(),
                w,
                h,
                content.media_type
            ),
            _ => tracing::debug!(
                "Kept {:?} as-is in {:?} ({})",
                name,
                start.elapsed(),
                content.media_type
            ),
        }
        Ok(ImageRecord::new(name, content))
    }

    /// Ingest a batch, appending records to `board` as they complete.
    pub async fn ingest(
        &self,
        handles: Vec<FileHandle>,
        board: &BoardHandle,
    ) -> Result<IngestReport> {
        self.ingest_with(handles, board, |_| {}).await
    }

    /// Like [`Ingestor::ingest`], calling `on_event` once per file as it settles.
    pub async fn ingest_with(
        &self,
        handles: Vec<FileHandle>,
        board: &BoardHandle,
        on_event: impl FnMut(&IngestEvent),
    ) -> Result<IngestReport> {
        let units = handles.into_iter().map(|handle| {
            let name = handle.name.clone();
            async move { (name, self.prepare(handle).await) }
        });
        append_as_completed(units, self.max_concurrent, board, on_event).await
    }

    /// Check if thumbnails will be attached to records.
    pub fn thumbnails_enabled(&self) -> bool {
        self.thumbnail_gen.is_enabled()
    }
}

/// Drive decode units concurrently and append each success to the board the
/// moment it finishes.
///
/// At most `limit` units are in flight. Failures are logged and counted. The
/// only error returned is a closed board.
pub async fn append_as_completed<I, F>(
    units: I,
    limit: usize,
    board: &BoardHandle,
    mut on_event: impl FnMut(&IngestEvent),
) -> Result<IngestReport>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = (String, IngestResult<ImageRecord>)>,
{
    let start = Instant::now();
    let mut report = IngestReport::default();
    let mut completed = stream::iter(units).buffer_unordered(limit.max(1));

    while let Some((name, result)) = completed.next().await {
        report.submitted += 1;
        let event = match result {
            Ok(record) => {
                let id = record.id;
                let index = board.append(record).await?;
                report.appended.push(id);
                IngestEvent::Appended { name, id, index }
            }
            Err(error) => {
                tracing::warn!("Dropped {:?}: {}", name, error);
                report.failed += 1;
                IngestEvent::Failed { name, error }
            }
        };
        on_event(&event);
    }

    report.total_seconds = start.elapsed().as_secs_f64();
    tracing::info!(
        "Ingested {}/{} file(s) ({} failed) in {:.2}s",
        report.appended_count(),
        report.submitted,
        report.failed,
        report.total_seconds
    );
    Ok(report)
}
