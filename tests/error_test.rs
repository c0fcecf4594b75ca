//! Error kinds as seen by callers

use rotor_ledger::persistence::{CsvFileAdapter, PersistenceAdapter};
use rotor_ledger::LedgerError;
use rotor_ledger_common::{Error, LedgerStore};
use tempfile::tempdir;

#[test]
fn test_core_errors_pass_through() {
    let mut store = LedgerStore::new();
    let err: LedgerError = store.remove(0).unwrap_err().into();

    assert!(err.is_out_of_range());
    assert!(!err.is_validation());
    assert_eq!(
        err.to_string(),
        "Position 0 is out of range (ledger has 0 records)"
    );
}

#[test]
fn test_validation_helper() {
    let err = LedgerError::validation("row 4: invalid quantity 'x'");

    assert!(err.is_validation());
    assert!(matches!(err, LedgerError::Ledger(Error::Validation(_))));
    assert_eq!(err.to_string(), "Validation error: row 4: invalid quantity 'x'");
}

#[test]
fn test_unavailable_message_names_backend() {
    let err = LedgerError::unavailable("xlsx", "file is locked");

    assert!(err.is_persistence_unavailable());
    assert!(err.to_string().contains("try again"));
    assert!(err.to_string().contains("xlsx: file is locked"));
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: LedgerError = io.into();
    assert!(matches!(err, LedgerError::Io(_)));
    assert!(!err.is_persistence_unavailable());
}

#[test]
fn test_directory_as_ledger_file_is_unavailable() {
    let dir = tempdir().expect("Failed to create temp dir");

    // The path exists but is a directory
    let err = CsvFileAdapter::new(dir.path()).load().unwrap_err();
    assert!(err.is_persistence_unavailable());
}
