//! Workbook (XLSX) backend
//!
//! Reads the `Ledger` sheet (or the first sheet of a foreign workbook) with
//! calamine and rewrites the whole file through the common excel core.

use super::row::records_from_rows;
use super::{as_unavailable, write_replacing, PersistenceAdapter};
use crate::error::{LedgerError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Days, NaiveDate};
use rotor_ledger_common::export::excel_core::{generate_ledger_workbook, LEDGER_SHEET};
use rotor_ledger_common::schema::DATE_FORMAT;
use rotor_ledger_common::Record;
use std::path::{Path, PathBuf};
use tracing::debug;

const BACKEND: &str = "xlsx";

#[derive(Debug, Clone)]
pub struct WorkbookAdapter {
    path: PathBuf,
    title: String,
}

impl WorkbookAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            title: "Rotor Stock Log".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Excel serial day number → calendar date (1900 date system)
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

/// Cell → text as the row codec expects it
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        other => other.to_string(),
    }
}

impl PersistenceAdapter for WorkbookAdapter {
    fn load(&self) -> Result<Vec<Record>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no workbook yet, starting empty");
            return Ok(Vec::new());
        }

        let mut workbook =
            open_workbook_auto(&self.path).map_err(|e| LedgerError::unavailable(BACKEND, e))?;

        let sheet_index = workbook
            .sheet_names()
            .iter()
            .position(|name| name == LEDGER_SHEET)
            .unwrap_or(0);

        let range = match workbook.worksheet_range_at(sheet_index) {
            Some(range) => range.map_err(|e| LedgerError::unavailable(BACKEND, e))?,
            None => return Ok(Vec::new()),
        };

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());

        let header = match rows.next() {
            Some(header) => header,
            None => return Ok(Vec::new()),
        };

        let records = records_from_rows(&header, rows).map_err(|e| as_unavailable(BACKEND, e))?;
        debug!(path = %self.path.display(), count = records.len(), "loaded workbook ledger");
        Ok(records)
    }

    fn save(&mut self, records: &[Record]) -> Result<()> {
        let buffer = generate_ledger_workbook(records, &self.title, true)
            .map_err(|e| LedgerError::unavailable(BACKEND, e))?;
        write_replacing(&self.path, &buffer).map_err(|e| LedgerError::unavailable(BACKEND, e))?;
        debug!(path = %self.path.display(), count = records.len(), "saved workbook ledger");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("workbook {}", self.path.display())
    }
}
