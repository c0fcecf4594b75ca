//! Core error types

use thiserror::Error;

/// Ledger core error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Position {position} is out of range (ledger has {len} records)")]
    OutOfRange { position: usize, len: usize },

    #[error("Export error: {0}")]
    Export(String),
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;
