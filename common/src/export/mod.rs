//! Export core modules shared by the CLI and the file backends.

#[cfg(feature = "excel")]
pub mod excel_core;
