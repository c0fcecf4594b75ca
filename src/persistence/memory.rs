//! In-process backend
//!
//! Holds the "persisted" copy in memory. Load and save can be switched to
//! fail, which lets callers exercise the unavailable-storage paths.

use super::PersistenceAdapter;
use crate::error::{LedgerError, Result};
use rotor_ledger_common::Record;

#[derive(Debug, Clone, Default)]
pub struct MemoryAdapter {
    records: Vec<Record>,
    fail_load: bool,
    fail_save: bool,
    saves: usize,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn fail_load(&mut self, fail: bool) {
        self.fail_load = fail;
    }

    pub fn fail_save(&mut self, fail: bool) {
        self.fail_save = fail;
    }

    /// Last successfully saved collection
    pub fn stored(&self) -> &[Record] {
        &self.records
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn load(&self) -> Result<Vec<Record>> {
        if self.fail_load {
            return Err(LedgerError::unavailable("memory", "load disabled"));
        }
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[Record]) -> Result<()> {
        if self.fail_save {
            return Err(LedgerError::unavailable("memory", "save disabled"));
        }
        self.records = records.to_vec();
        self.saves += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory ledger".to_string()
    }
}
