pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod persistence;
pub mod report;
pub mod session;

pub use error::{LedgerError, Result};
pub use persistence::{Backend, PersistenceAdapter};
pub use session::LedgerSession;
