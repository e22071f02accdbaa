//! The ordered image store.
//!
//! Insertion order is display order and the only state that expresses it.
//! The store grows by [`ImageStore::append`] and is rearranged by
//! [`ImageStore::move_image`]; nothing is ever removed.

use std::collections::HashSet;

use crate::error::{BoardError, ReorderError};
use crate::reorder::move_element;
use crate::types::{ImageId, ImageRecord};

/// In-memory ordered sequence of image records with unique ids.
#[derive(Debug, Default, Clone)]
pub struct ImageStore {
    records: Vec<ImageRecord>,
    ids: HashSet<ImageId>,
}

impl ImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the end of the current sequence.
    ///
    /// Fails if a record with the same id is already present; the store is
    /// unchanged in that case.
    pub fn append(&mut self, record: ImageRecord) -> Result<usize, BoardError> {
        if !self.ids.insert(record.id) {
            return Err(BoardError::DuplicateId(record.id.to_string()));
        }
        self.records.push(record);
        Ok(self.records.len() - 1)
    }

    /// Move the record at `source_index` to `destination_index`.
    ///
    /// Returns whether the order changed. See [`move_element`] for the exact
    /// semantics.
    pub fn move_image(
        &mut self,
        source_index: usize,
        destination_index: usize,
    ) -> Result<bool, ReorderError> {
        move_element(&mut self.records, source_index, destination_index)
    }

    /// Records in display order.
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    /// Ids in display order.
    pub fn order(&self) -> Vec<ImageId> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// Current position of the record with `id`.
    pub fn position(&self, id: ImageId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Look up a record by id.
    pub fn get(&self, id: ImageId) -> Option<&ImageRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
