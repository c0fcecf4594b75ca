//! JSON document backend

use super::{core_message, write_replacing, PersistenceAdapter};
use crate::error::{LedgerError, Result};
use rotor_ledger_common::Record;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const BACKEND: &str = "json";

/// On-disk document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerDocument {
    /// Layout version, checked on load
    version: u32,
    records: Vec<Record>,
}

impl LedgerDocument {
    const CURRENT_VERSION: u32 = 1;

    pub fn new(records: Vec<Record>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            records,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileAdapter {
    path: PathBuf,
}

impl JsonFileAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceAdapter for JsonFileAdapter {
    fn load(&self) -> Result<Vec<Record>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no ledger file yet, starting empty");
            return Ok(Vec::new());
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| LedgerError::unavailable(BACKEND, e))?;
        let document: LedgerDocument =
            serde_json::from_str(&content).map_err(|e| LedgerError::unavailable(BACKEND, e))?;

        if document.version != LedgerDocument::CURRENT_VERSION {
            return Err(LedgerError::unavailable(
                BACKEND,
                format!("unsupported ledger version {}", document.version),
            ));
        }

        for (i, record) in document.records.iter().enumerate() {
            record.validate().map_err(|e| {
                LedgerError::validation(format!("record {}: {}", i + 1, core_message(e)))
            })?;
        }

        debug!(path = %self.path.display(), count = document.records.len(), "loaded json ledger");
        Ok(document.records)
    }

    fn save(&mut self, records: &[Record]) -> Result<()> {
        let document = LedgerDocument::new(records.to_vec());
        let content =
            serde_json::to_vec_pretty(&document).map_err(|e| LedgerError::unavailable(BACKEND, e))?;
        write_replacing(&self.path, &content).map_err(|e| LedgerError::unavailable(BACKEND, e))?;
        debug!(path = %self.path.display(), count = records.len(), "saved json ledger");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_rejects_invalid_record() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("ledger.json");
        std::fs::write(
            &path,
            r#"{"version": 1, "records": [
                {"date": "2024-01-10", "size": "32", "quantity": 10, "movement": "Inward"},
                {"date": "2024-01-11", "size": "   ", "quantity": 2, "movement": "Outward"}
            ]}"#,
        )
        .unwrap();

        let err = JsonFileAdapter::new(&path).load().unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("record 2:"), "{}", err);
    }
}
