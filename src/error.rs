use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// Validation / out-of-range errors from the core
    #[error(transparent)]
    Ledger(#[from] rotor_ledger_common::Error),

    #[error("Could not reach the ledger storage, try again: {0}")]
    PersistenceUnavailable(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LedgerError {
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Ledger(rotor_ledger_common::Error::Validation(_)))
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, LedgerError::Ledger(rotor_ledger_common::Error::OutOfRange { .. }))
    }

    pub fn is_persistence_unavailable(&self) -> bool {
        matches!(self, LedgerError::PersistenceUnavailable(_))
    }

    /// Validation error with a message, for row-level ingestion failures
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Ledger(rotor_ledger_common::Error::Validation(message.into()))
    }

    /// Wraps a transport failure of a backend
    pub fn unavailable(backend: &str, source: impl std::fmt::Display) -> Self {
        LedgerError::PersistenceUnavailable(format!("{}: {}", backend, source))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
