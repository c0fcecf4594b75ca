//! Flat-file (CSV) backend

use super::row::{read_csv, write_csv};
use super::{as_unavailable, write_replacing, PersistenceAdapter};
use crate::error::{LedgerError, Result};
use rotor_ledger_common::Record;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

const BACKEND: &str = "csv";

#[derive(Debug, Clone)]
pub struct CsvFileAdapter {
    path: PathBuf,
}

impl CsvFileAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceAdapter for CsvFileAdapter {
    fn load(&self) -> Result<Vec<Record>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no ledger file yet, starting empty");
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).map_err(|e| LedgerError::unavailable(BACKEND, e))?;
        let records = read_csv(BufReader::new(file)).map_err(|e| as_unavailable(BACKEND, e))?;
        debug!(path = %self.path.display(), count = records.len(), "loaded csv ledger");
        Ok(records)
    }

    fn save(&mut self, records: &[Record]) -> Result<()> {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, records).map_err(|e| as_unavailable(BACKEND, e))?;
        write_replacing(&self.path, &buffer).map_err(|e| LedgerError::unavailable(BACKEND, e))?;
        debug!(path = %self.path.display(), count = records.len(), "saved csv ledger");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }
}
