//! Dropboard Core - ingest dropped images and keep them in a reorderable board.
//!
//! Files offered by a drop or a picker pass an accept filter, decode
//! concurrently into display-ready records, and land on the board in the
//! order they finish. A drag gesture then rearranges the board one
//! single-element move at a time.
//!
//! # Architecture
//!
//! ```text
//! FileHandle → AcceptFilter → Ingestor (decode ∥) → BoardHandle → Board task (ImageStore)
//!                                                        ▲
//!                                    DragSession hover ──┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use dropboard_core::{Config, Dropboard, DragSession, FileHandle};
//!
//! #[tokio::main]
//! async fn main() -> dropboard_core::Result<()> {
//!     let board = Dropboard::new(Config::load()?);
//!     board.drop_files(vec![FileHandle::from_path("./cat.png")]).await?;
//!
//!     let mut drag = DragSession::start(0);
//!     board.hover(&mut drag, 1).await?;
//!     println!("{:?}", board.order().await?);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod accept;
pub mod board;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod reorder;
pub mod store;
pub mod types;

// Re-exports for convenient access
pub use accept::{AcceptFilter, AcceptOutcome};
pub use board::{Board, BoardHandle};
pub use config::Config;
pub use error::{BoardError, ConfigError, IngestError, IngestResult, ReorderError, Result};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{FileDiscovery, FileHandle, IngestEvent, Ingestor};
pub use reorder::{move_element, DragSession};
pub use store::ImageStore;
pub use types::{ImageContent, ImageId, ImageRecord, IngestReport};

use tokio::task::JoinHandle;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A board together with the pipeline that feeds it.
///
/// Owns one board task. Clone the [`BoardHandle`] from [`Dropboard::handle`]
/// to reach the same board from other tasks.
pub struct Dropboard {
    config: Config,
    accept: AcceptFilter,
    ingestor: Ingestor,
    board: BoardHandle,
    task: JoinHandle<ImageStore>,
}

impl Dropboard {
    /// Create a new, empty board. Must be called inside a tokio runtime.
    pub fn new(config: Config) -> Self {
        let accept = AcceptFilter::parse(&config.ingest.accept);
        let ingestor = Ingestor::new(&config);
        let (board, task) = Board::spawn(&config.board);
        tracing::debug!("Dropboard v{} ready (accept = {:?})", VERSION, config.ingest.accept);
        Self {
            config,
            accept,
            ingestor,
            board,
            task,
        }
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The accept filter applied to dropped files.
    pub fn accept_filter(&self) -> &AcceptFilter {
        &self.accept
    }

    /// Handle to the underlying board task.
    pub fn handle(&self) -> BoardHandle {
        self.board.clone()
    }

    /// Filter a dropped batch and ingest what passes.
    pub async fn drop_files(&self, handles: Vec<FileHandle>) -> Result<IngestReport> {
        self.drop_files_with(handles, |_| {}).await
    }

    /// Like [`Dropboard::drop_files`], reporting each file as it settles.
    pub async fn drop_files_with(
        &self,
        handles: Vec<FileHandle>,
        on_event: impl FnMut(&IngestEvent),
    ) -> Result<IngestReport> {
        let outcome = self.accept.partition(handles);
        if !outcome.rejected.is_empty() {
            tracing::info!("Rejected {} file(s) by accept filter", outcome.rejected.len());
        }
        let mut report = self
            .ingestor
            .ingest_with(outcome.accepted, &self.board, on_event)
            .await?;
        report.rejected = outcome.rejected;
        Ok(report)
    }

    /// Move the record at `from` to `to`.
    pub async fn move_image(&self, from: usize, to: usize) -> Result<bool> {
        self.board.move_image(from, to).await
    }

    /// Apply one hover of a drag session.
    pub async fn hover(&self, session: &mut DragSession, hover_index: usize) -> Result<bool> {
        self.board.hover(session, hover_index).await
    }

    /// All records in display order.
    pub async fn snapshot(&self) -> Result<Vec<ImageRecord>> {
        self.board.snapshot().await
    }

    /// Record ids in display order.
    pub async fn order(&self) -> Result<Vec<ImageId>> {
        self.board.order().await
    }

    /// Shut the board down and take the final store.
    ///
    /// Waits for any outstanding [`BoardHandle`] clones to drop first.
    pub async fn into_store(self) -> Result<ImageStore> {
        drop(self.board);
        self.task.await.map_err(|_| BoardError::Closed)
    }
}
