//! Persistence backends
//!
//! Every backend loads and saves the whole ledger at once. Transport failures
//! (I/O, CSV, workbook, JSON) surface as `PersistenceUnavailable`; rows that
//! break record invariants surface as validation errors naming the row.

pub mod csv_file;
pub mod json_file;
pub mod memory;
pub mod row;
pub mod workbook;

pub use csv_file::CsvFileAdapter;
pub use json_file::JsonFileAdapter;
pub use memory::MemoryAdapter;
pub use workbook::WorkbookAdapter;

use crate::error::{LedgerError, Result};
use rotor_ledger_common::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Backing store of a ledger
pub trait PersistenceAdapter {
    /// Full ledger in stored order; empty when nothing was saved yet
    fn load(&self) -> Result<Vec<Record>>;

    /// Overwrites the backing store with `records`
    fn save(&mut self, records: &[Record]) -> Result<()>;

    /// Human-readable location, for messages
    fn describe(&self) -> String;
}

impl<A: PersistenceAdapter + ?Sized> PersistenceAdapter for Box<A> {
    fn load(&self) -> Result<Vec<Record>> {
        (**self).load()
    }

    fn save(&mut self, records: &[Record]) -> Result<()> {
        (**self).save(records)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Csv,
    Xlsx,
    Json,
}

impl Backend {
    /// Infers the backend from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Backend::Csv),
            "xlsx" => Some(Backend::Xlsx),
            "json" => Some(Backend::Json),
            _ => None,
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Backend::Csv),
            "xlsx" | "excel" => Ok(Backend::Xlsx),
            "json" => Ok(Backend::Json),
            _ => Err(format!("Unknown backend: {}. Use csv, xlsx, or json", s)),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Csv => write!(f, "csv"),
            Backend::Xlsx => write!(f, "xlsx"),
            Backend::Json => write!(f, "json"),
        }
    }
}

pub fn open_adapter(backend: Backend, path: PathBuf) -> Box<dyn PersistenceAdapter> {
    match backend {
        Backend::Csv => Box::new(CsvFileAdapter::new(path)),
        Backend::Xlsx => Box::new(WorkbookAdapter::new(path)),
        Backend::Json => Box::new(JsonFileAdapter::new(path)),
    }
}

/// Turns transport-level errors into `PersistenceUnavailable`
pub(crate) fn as_unavailable(backend: &str, error: LedgerError) -> LedgerError {
    match error {
        LedgerError::Io(e) => LedgerError::unavailable(backend, e),
        LedgerError::Csv(e) => LedgerError::unavailable(backend, e),
        LedgerError::Json(e) => LedgerError::unavailable(backend, e),
        other => other,
    }
}

/// Inner text of a core validation error, for prefixing with a row or record number
pub(crate) fn core_message(error: rotor_ledger_common::Error) -> String {
    match error {
        rotor_ledger_common::Error::Validation(msg) => msg,
        other => other.to_string(),
    }
}

/// Writes next to the target and renames, so a failed save never leaves a half-written file
pub(crate) fn write_replacing(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, bytes)?;
    std::fs::rename(&tmp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_path() {
        assert_eq!(Backend::from_path(Path::new("log.csv")), Some(Backend::Csv));
        assert_eq!(Backend::from_path(Path::new("log.XLSX")), Some(Backend::Xlsx));
        assert_eq!(Backend::from_path(Path::new("data/log.json")), Some(Backend::Json));
        assert_eq!(Backend::from_path(Path::new("log")), None);
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!("excel".parse::<Backend>().unwrap(), Backend::Xlsx);
        assert!("sheets".parse::<Backend>().is_err());
    }

    #[test]
    fn test_as_unavailable_keeps_validation() {
        let err = as_unavailable("csv", LedgerError::validation("row 2: bad"));
        assert!(err.is_validation());

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = as_unavailable("csv", LedgerError::Io(io));
        assert!(err.is_persistence_unavailable());
    }
}
