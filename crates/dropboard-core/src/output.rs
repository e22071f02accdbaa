//! Board output as JSON or JSON Lines.
//!
//! The board is written in display order, each entry carrying its position
//! so consumers never have to infer order from array layout alone.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::ImageRecord;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// One record with its display position.
#[derive(Debug, Serialize)]
pub struct BoardEntry<'a> {
    pub position: usize,
    #[serde(flatten)]
    pub record: &'a ImageRecord,
}

/// Pair every record with its position.
pub fn board_entries(records: &[ImageRecord]) -> Vec<BoardEntry<'_>> {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| BoardEntry { position, record })
        .collect()
}

/// A writer that serializes board entries to JSON or JSONL.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects the JSON format; JSONL is always one line per item.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write a whole board in display order.
    pub fn write_board(&mut self, records: &[ImageRecord]) -> io::Result<()> {
        self.write_all(&board_entries(records))
    }

    /// Write multiple items: a JSON array, or one JSONL line each.
    pub fn write_all<T: Serialize>(&mut self, items: &[T]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, items)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, items).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.items_written += items.len();
            }
            OutputFormat::JsonLines => {
                for item in items {
                    serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
                    writeln!(self.writer)?;
                    self.items_written += 1;
                }
            }
        }
        Ok(())
    }

    /// Get the number of items written.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
