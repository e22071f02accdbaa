//! The board task: sole owner and writer of the [`ImageStore`].
//!
//! Every mutation travels as a [`BoardCommand`] over one bounded channel and
//! is applied by a single task, one command per turn. Decodes may finish on
//! any thread in any order; their appends still land one at a time, in the
//! order they reach the channel.
//!
//! ```text
//! decode ─┐
//! decode ─┼─► mpsc ─► board task (ImageStore) ◄─ hover/move
//! decode ─┘
//! ```

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::BoardConfig;
use crate::error::{BoardError, ReorderError, Result};
use crate::reorder::DragSession;
use crate::store::ImageStore;
use crate::types::{ImageId, ImageRecord};

/// Commands understood by the board task.
#[derive(Debug)]
pub enum BoardCommand {
    /// Append a record at the end; replies with its index
    Append {
        record: ImageRecord,
        reply: oneshot::Sender<Result<usize>>,
    },
    /// Single-element move; replies with whether the order changed
    Move {
        from: usize,
        to: usize,
        reply: oneshot::Sender<std::result::Result<bool, ReorderError>>,
    },
    /// Copy of all records in display order
    Snapshot {
        reply: oneshot::Sender<Vec<ImageRecord>>,
    },
    /// Ids in display order
    Order {
        reply: oneshot::Sender<Vec<ImageId>>,
    },
    /// Number of records
    Len { reply: oneshot::Sender<usize> },
}

/// Create a bounded command channel with the configured buffer size.
///
/// When the buffer is full, senders wait, which keeps a burst of finished
/// decodes from piling up unbounded in front of the board.
pub fn bounded_channel<T>(config: &BoardConfig) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
    mpsc::channel(config.command_buffer)
}

/// Owns the store and applies commands to it.
pub struct Board {
    store: ImageStore,
    commands: mpsc::Receiver<BoardCommand>,
}

impl Board {
    /// Spawn a board task over an empty store.
    ///
    /// The task runs until every [`BoardHandle`] is dropped and then yields
    /// the final store through the join handle.
    pub fn spawn(config: &BoardConfig) -> (BoardHandle, JoinHandle<ImageStore>) {
        Self::spawn_with(config, ImageStore::new())
    }

    /// Spawn a board task over an existing store.
    pub fn spawn_with(
        config: &BoardConfig,
        store: ImageStore,
    ) -> (BoardHandle, JoinHandle<ImageStore>) {
        let (tx, rx) = bounded_channel(config);
        let board = Board {
            store,
            commands: rx,
        };
        let task = tokio::spawn(board.run());
        (BoardHandle { tx }, task)
    }

    async fn run(mut self) -> ImageStore {
        while let Some(command) = self.commands.recv().await {
            self.apply(command);
        }
        tracing::debug!("Board closed with {} record(s)", self.store.len());
        self.store
    }

    fn apply(&mut self, command: BoardCommand) {
        // A dropped reply receiver only means the caller stopped waiting.
        match command {
            BoardCommand::Append { record, reply } => {
                let id = record.id;
                let result = self.store.append(record);
                if let Ok(index) = &result {
                    tracing::debug!("Appended {:?} at {}", id, index);
                }
                let _ = reply.send(result);
            }
            BoardCommand::Move { from, to, reply } => {
                let result = self.store.move_image(from, to);
                match &result {
                    Ok(true) => tracing::trace!("Moved {} -> {}", from, to),
                    Ok(false) => {}
                    Err(e) => tracing::warn!("Rejected move {} -> {}: {}", from, to, e),
                }
                let _ = reply.send(result);
            }
            BoardCommand::Snapshot { reply } => {
                let _ = reply.send(self.store.records().to_vec());
            }
            BoardCommand::Order { reply } => {
                let _ = reply.send(self.store.order());
            }
            BoardCommand::Len { reply } => {
                let _ = reply.send(self.store.len());
            }
        }
    }
}

/// Cloneable handle for sending commands to a board task.
#[derive(Debug, Clone)]
pub struct BoardHandle {
    tx: mpsc::Sender<BoardCommand>,
}

impl BoardHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> BoardCommand,
    ) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| BoardError::Closed)?;
        rx.await.map_err(|_| BoardError::Closed)
    }

    /// Append a record at the end of the board; returns its index.
    pub async fn append(&self, record: ImageRecord) -> Result<usize> {
        self.request(|reply| BoardCommand::Append { record, reply })
            .await?
    }

    /// Move the record at `from` to `to`; returns whether the order changed.
    pub async fn move_image(&self, from: usize, to: usize) -> Result<bool> {
        Ok(self
            .request(|reply| BoardCommand::Move { from, to, reply })
            .await??)
    }

    /// Apply one hover of a drag session.
    ///
    /// Same-slot hovers never reach the board. The session only advances once
    /// the board has applied the move.
    pub async fn hover(&self, session: &mut DragSession, hover_index: usize) -> Result<bool> {
        let Some(mv) = session.hover(hover_index) else {
            return Ok(false);
        };
        let moved = self.move_image(mv.from, mv.to).await?;
        session.commit(mv);
        Ok(moved)
    }

    /// All records in display order.
    pub async fn snapshot(&self) -> Result<Vec<ImageRecord>> {
        self.request(|reply| BoardCommand::Snapshot { reply }).await
    }

    /// Record ids in display order.
    pub async fn order(&self) -> Result<Vec<ImageId>> {
        self.request(|reply| BoardCommand::Order { reply }).await
    }

    /// Number of records on the board.
    pub async fn len(&self) -> Result<usize> {
        self.request(|reply| BoardCommand::Len { reply }).await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}
