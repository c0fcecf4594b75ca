//! Ledger store
//!
//! Ordered, owned collection of records. Positions are dense: removing a
//! record shifts every later record down by one, so any position held by a
//! caller is stale after a removal. Each slot also carries a [`RecordId`]
//! that survives re-indexing for as long as the store lives.

use crate::error::{Error, Result};
use crate::record::Record;
use std::fmt;

/// Opaque per-store identifier of a record slot (never persisted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    records: Vec<Record>,
    ids: Vec<RecordId>,
    next_id: u64,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from already loaded records
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut store = Self::new();
        store.replace_all(records)?;
        Ok(store)
    }

    fn issue_id(&mut self) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        id
    }

    fn check_position(&self, position: usize) -> Result<()> {
        if position >= self.records.len() {
            return Err(Error::OutOfRange {
                position,
                len: self.records.len(),
            });
        }
        Ok(())
    }

    /// Appends a record and returns its position
    pub fn append(&mut self, record: Record) -> Result<usize> {
        record.validate()?;
        let id = self.issue_id();
        self.records.push(record);
        self.ids.push(id);
        Ok(self.records.len() - 1)
    }

    /// Replaces the record at `position` wholesale
    ///
    /// The store is left untouched on any error. The slot keeps its id.
    pub fn update(&mut self, position: usize, record: Record) -> Result<()> {
        self.check_position(position)?;
        record.validate()?;
        self.records[position] = record;
        Ok(())
    }

    /// Removes the record at `position` and re-indexes the tail
    pub fn remove(&mut self, position: usize) -> Result<Record> {
        self.check_position(position)?;
        self.ids.remove(position);
        Ok(self.records.remove(position))
    }

    /// Removes several positions at once
    ///
    /// Positions are processed in descending order so earlier removals never
    /// shift later targets. Duplicates collapse. If any position is out of
    /// range nothing is removed. Returned records are in ascending position order.
    pub fn remove_many(&mut self, positions: &[usize]) -> Result<Vec<Record>> {
        let mut sorted: Vec<usize> = positions.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        if let Some(&max) = sorted.last() {
            self.check_position(max)?;
        }

        let mut removed = Vec::with_capacity(sorted.len());
        for &position in sorted.iter().rev() {
            self.ids.remove(position);
            removed.push(self.records.remove(position));
        }
        removed.reverse();
        Ok(removed)
    }

    /// Read-only ordered view
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    /// Bulk overwrite (load / reconcile); every record gets a fresh id
    pub fn replace_all(&mut self, records: Vec<Record>) -> Result<()> {
        for (position, record) in records.iter().enumerate() {
            record.validate().map_err(|e| match e {
                Error::Validation(msg) => Error::Validation(format!("record {}: {}", position, msg)),
                other => other,
            })?;
        }

        let ids: Vec<RecordId> = (0..records.len()).map(|_| self.issue_id()).collect();
        self.ids = ids;
        self.records = records;
        Ok(())
    }

    pub fn get(&self, position: usize) -> Option<&Record> {
        self.records.get(position)
    }

    pub fn id_at(&self, position: usize) -> Option<RecordId> {
        self.ids.get(position).copied()
    }

    /// Current position of a slot, `None` once it has been removed
    pub fn position_of(&self, id: RecordId) -> Option<usize> {
        self.ids.iter().position(|&i| i == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
