//! Ledger export (CSV / Excel)
//!
//! Exports never touch ledger state; they serialize the given records in the
//! persisted column order.

use crate::error::{LedgerError, Result};
use crate::persistence::row::write_csv;
use rotor_ledger_common::export::excel_core::generate_ledger_workbook;
use rotor_ledger_common::Record;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            _ => Err(format!("Unknown format: {}. Use csv or xlsx", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// A directory or extension-less path resolves to `<output>/<title>.<ext>`
pub fn output_path_for_format(output: &Path, title: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", title, extension))
    } else {
        output.to_path_buf()
    }
}

/// Serializes the ledger to bytes
pub fn export_bytes(records: &[Record], format: ExportFormat, title: &str) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => {
            let mut buffer = Vec::new();
            write_csv(&mut buffer, records)?;
            Ok(buffer)
        }
        ExportFormat::Xlsx => Ok(generate_ledger_workbook(records, title, true)?),
    }
}

/// Writes the export file and returns its path
pub fn export_records(
    records: &[Record],
    format: ExportFormat,
    output: &Path,
    title: &str,
) -> Result<PathBuf> {
    let output_path = output_path_for_format(output, title, format.extension());

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(LedgerError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("output directory not found: {}", parent.display()),
            )));
        }
    }

    let bytes = export_bytes(records, format, title)?;
    std::fs::write(&output_path, bytes)?;
    info!(path = %output_path.display(), format = %format, count = records.len(), "ledger exported");
    Ok(output_path)
}
