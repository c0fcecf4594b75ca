//! Ledger session
//!
//! Binds a `LedgerStore` to one persistence backend. Every successful
//! mutation is followed by a full save. A failed save is reported as
//! `PersistenceUnavailable` while the in-memory change stays applied;
//! validation and range errors never reach the backend.

use crate::error::Result;
use crate::persistence::PersistenceAdapter;
use rotor_ledger_common::{
    available_stock, net_stock, LedgerStore, Record, RecordFilter, StockLevel, StockOptions,
};
use tracing::{debug, info, warn};

pub struct LedgerSession<A: PersistenceAdapter> {
    store: LedgerStore,
    adapter: A,
}

impl<A: PersistenceAdapter> LedgerSession<A> {
    /// Loads the ledger through `adapter`
    pub fn open(adapter: A) -> Result<Self> {
        let records = adapter.load()?;
        let store = LedgerStore::from_records(records)?;
        info!(source = %adapter.describe(), count = store.len(), "ledger opened");
        Ok(Self { store, adapter })
    }

    fn persist(&mut self) -> Result<()> {
        match self.adapter.save(self.store.all()) {
            Ok(()) => {
                debug!(count = self.store.len(), "ledger saved");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "save failed; in-memory ledger is ahead of storage");
                Err(e)
            }
        }
    }

    /// Appends a record, saves, and returns its position
    pub fn append(&mut self, record: Record) -> Result<usize> {
        let position = self.store.append(record)?;
        self.persist()?;
        Ok(position)
    }

    /// Replaces the record at `position`, then saves
    pub fn update(&mut self, position: usize, record: Record) -> Result<()> {
        self.store.update(position, record)?;
        self.persist()
    }

    /// Removes the record at `position`, then saves
    pub fn remove(&mut self, position: usize) -> Result<Record> {
        let removed = self.store.remove(position)?;
        self.persist()?;
        Ok(removed)
    }

    /// Removes several positions in one save
    pub fn remove_many(&mut self, positions: &[usize]) -> Result<Vec<Record>> {
        let removed = self.store.remove_many(positions)?;
        self.persist()?;
        Ok(removed)
    }

    /// Re-reads the backend, discarding the in-memory state
    ///
    /// On failure the current state is kept.
    pub fn reload(&mut self) -> Result<()> {
        let records = self.adapter.load()?;
        self.store.replace_all(records)?;
        info!(count = self.store.len(), "ledger reloaded");
        Ok(())
    }

    pub fn records(&self) -> &[Record] {
        self.store.all()
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn net_stock(&self, options: StockOptions) -> Vec<StockLevel> {
        net_stock(self.store.all(), options)
    }

    pub fn available_stock(&self, options: StockOptions) -> Vec<StockLevel> {
        available_stock(self.store.all(), options)
    }

    /// Filtered view with store positions
    pub fn filter(&self, filter: &RecordFilter) -> Vec<(usize, &Record)> {
        filter.apply_indexed(self.store.all())
    }

    pub fn into_parts(self) -> (LedgerStore, A) {
        (self.store, self.adapter)
    }
}
