//! Rotor Ledger Common Library
//!
//! Storage-agnostic core of the rotor ledger: records, the ledger store,
//! stock aggregation and query filters. File backends and the CLI live in
//! the `rotor-ledger` crate.

pub mod error;
pub mod export;
pub mod filter;
pub mod record;
pub mod schema;
pub mod stock;
pub mod store;

pub use error::{Error, Result};
pub use filter::RecordFilter;
pub use record::{canonical_size, MovementType, Record, StockStatus};
pub use stock::{available_stock, net_stock, running_balance, stock_for, StockLevel, StockOptions};
pub use store::{LedgerStore, RecordId};
