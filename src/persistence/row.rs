//! Flat row codec
//!
//! Ingestion boundary between the tabular backends (CSV, XLSX) and `Record`.
//! All spelling variants (`in`/`Inward`/`Outgoing`, `Coming Rotors`, legacy
//! headers, timestamps in the date column) are resolved here.
//!
//! Two row layouts are read:
//! - movement rows: one `type` + `quantity` pair per row (the layout written);
//! - split rows: `Inward Qty` / `Outward Qty` columns, as in the auto-save
//!   workbook. Each non-zero side becomes its own record, inward first.

use super::core_message;
use crate::error::{LedgerError, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use rotor_ledger_common::schema::{
    canonical_header, COLUMNS, COL_DATE, COL_INWARD_QTY, COL_OUTWARD_QTY, COL_PENDING,
    COL_QUANTITY, COL_REMARKS, COL_SIZE, COL_STATUS, COL_TYPE, DATE_FORMAT,
};
use rotor_ledger_common::{MovementType, Record, StockStatus};
use serde::Serialize;
use std::io::{Read, Write};

const MOVEMENT_REQUIRED: [&str; 4] = [COL_DATE, COL_SIZE, COL_QUANTITY, COL_TYPE];
const SPLIT_REQUIRED: [&str; 2] = [COL_DATE, COL_SIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Layout {
    #[default]
    Movement,
    Split,
}

/// Column name → cell index, built from a header row
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    columns: Vec<(&'static str, usize)>,
    layout: Layout,
}

impl HeaderMap {
    pub fn from_headers<'a, I>(headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut columns = Vec::new();
        for (index, header) in headers.into_iter().enumerate() {
            if let Some(col) = canonical_header(header) {
                if !columns.iter().any(|(c, _)| *c == col) {
                    columns.push((col, index));
                }
            }
        }

        let mut map = Self {
            columns,
            layout: Layout::Movement,
        };
        let has_movement = map.has(COL_QUANTITY) || map.has(COL_TYPE);
        let has_split = map.has(COL_INWARD_QTY) || map.has(COL_OUTWARD_QTY);
        if has_split && !has_movement {
            map.layout = Layout::Split;
        }

        let required: &[&str] = match map.layout {
            Layout::Movement => &MOVEMENT_REQUIRED,
            Layout::Split => &SPLIT_REQUIRED,
        };
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|c| !map.has(c))
            .collect();
        if !missing.is_empty() {
            return Err(LedgerError::validation(format!(
                "missing column(s): {}",
                missing.join(", ")
            )));
        }
        Ok(map)
    }

    fn index_of(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, i)| *i)
    }

    fn has(&self, column: &str) -> bool {
        self.index_of(column).is_some()
    }

    fn raw_cell<'r>(&self, cells: &'r [String], column: &str) -> &'r str {
        self.index_of(column)
            .and_then(|i| cells.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn cell<'r>(&self, cells: &'r [String], column: &str) -> &'r str {
        self.raw_cell(cells, column).trim()
    }

    /// Converts one data row; `row_number` is the 1-based sheet row used in messages
    ///
    /// A movement row yields one record. A split row yields one record per
    /// non-zero side, or none when both sides are zero.
    pub fn parse_row(&self, row_number: usize, cells: &[String]) -> Result<Vec<Record>> {
        let row_err = |msg: String| LedgerError::validation(format!("row {}: {}", row_number, msg));

        let date = parse_date(self.cell(cells, COL_DATE)).map_err(row_err)?;
        let pending = parse_flag(self.cell(cells, COL_PENDING)).map_err(row_err)?;
        let status: StockStatus = self
            .cell(cells, COL_STATUS)
            .parse()
            .map_err(|e| row_err(core_message(e)))?;

        let movements: Vec<(MovementType, u32)> = match self.layout {
            Layout::Movement => {
                let quantity = parse_quantity(self.cell(cells, COL_QUANTITY)).map_err(row_err)?;
                let movement: MovementType = self
                    .cell(cells, COL_TYPE)
                    .parse()
                    .map_err(|e| row_err(core_message(e)))?;
                vec![(movement, quantity)]
            }
            Layout::Split => {
                let inward = parse_split_quantity(self.cell(cells, COL_INWARD_QTY)).map_err(row_err)?;
                let outward =
                    parse_split_quantity(self.cell(cells, COL_OUTWARD_QTY)).map_err(row_err)?;
                [(MovementType::Inward, inward), (MovementType::Outward, outward)]
                    .into_iter()
                    .filter(|(_, quantity)| *quantity > 0)
                    .collect()
            }
        };

        movements
            .into_iter()
            .map(|(movement, quantity)| {
                let record = Record {
                    date,
                    size: self.raw_cell(cells, COL_SIZE).to_string(),
                    quantity,
                    movement,
                    pending,
                    status,
                    remarks: self.raw_cell(cells, COL_REMARKS).to_string(),
                };
                record.validate().map_err(|e| row_err(core_message(e)))?;
                Ok(record)
            })
            .collect()
    }
}

/// `YYYY-MM-DD`, optionally followed by a time part
pub fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    let day_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day_part, DATE_FORMAT)
        .map_err(|e| format!("invalid date '{}': {}", raw, e))
}

/// Integer count; whole-number floats (`"10.0"`) from spreadsheets are accepted
pub fn parse_quantity(raw: &str) -> std::result::Result<u32, String> {
    if let Ok(n) = raw.parse::<u32>() {
        return Ok(n);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f >= 0.0 && f <= f64::from(u32::MAX) => Ok(f as u32),
        _ => Err(format!("invalid quantity '{}'", raw)),
    }
}

/// Inward/outward cell of a split row; blank counts as zero
fn parse_split_quantity(raw: &str) -> std::result::Result<u32, String> {
    if raw.is_empty() {
        Ok(0)
    } else {
        parse_quantity(raw)
    }
}

fn parse_flag(raw: &str) -> std::result::Result<bool, String> {
    match raw.to_lowercase().as_str() {
        "" | "false" | "no" | "0" => Ok(false),
        "true" | "yes" | "1" => Ok(true),
        other => Err(format!("invalid pending flag '{}'", other)),
    }
}

fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(|c| c.trim().is_empty())
}

/// Converts a header row plus data rows tagged with their sheet row number
pub fn records_from_numbered_rows<I>(header: &[String], rows: I) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = (usize, Vec<String>)>,
{
    let map = HeaderMap::from_headers(header.iter().map(String::as_str))?;
    let mut records = Vec::new();
    for (row_number, cells) in rows {
        if is_blank(&cells) {
            continue;
        }
        records.extend(map.parse_row(row_number, &cells)?);
    }
    Ok(records)
}

/// Converts a header row plus contiguous data rows (sheet rows 2, 3, ...); blank rows are skipped
pub fn records_from_rows<I>(header: &[String], rows: I) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    records_from_numbered_rows(header, rows.into_iter().enumerate().map(|(i, cells)| (i + 2, cells)))
}

/// Reads a CSV ledger
///
/// Row numbers in errors are file line numbers; the reader skips empty
/// lines, so they are taken from the record positions.
pub fn read_csv<R: Read>(r: R) -> Result<Vec<Record>> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(r);

    let mut rows = rdr.records().enumerate().map(|(i, rec)| {
        rec.map(|r| {
            let line = r.position().map_or(i + 1, |p| p.line() as usize);
            (line, r.iter().map(str::to_string).collect::<Vec<String>>())
        })
    });

    let header = match rows.next() {
        Some(header) => header?.1,
        None => return Ok(Vec::new()),
    };
    if is_blank(&header) {
        return Ok(Vec::new());
    }

    let data: Vec<(usize, Vec<String>)> = rows.collect::<std::result::Result<_, _>>()?;
    records_from_numbered_rows(&header, data)
}

#[derive(Serialize)]
struct CsvOutRow<'a> {
    date: String,
    size: &'a str,
    quantity: u32,
    movement: &'static str,
    remarks: &'a str,
    pending: bool,
    status: String,
}

impl<'a> From<&'a Record> for CsvOutRow<'a> {
    fn from(r: &'a Record) -> Self {
        Self {
            date: r.date.format(DATE_FORMAT).to_string(),
            size: &r.size,
            quantity: r.quantity,
            movement: r.movement.as_code(),
            remarks: &r.remarks,
            pending: r.pending,
            status: r.status.to_string(),
        }
    }
}

/// Writes a CSV ledger; the header row is always present
pub fn write_csv<W: Write>(w: W, records: &[Record]) -> Result<()> {
    let mut wrt = WriterBuilder::new().has_headers(false).from_writer(w);
    wrt.write_record(COLUMNS)?;
    for record in records {
        wrt.serialize(CsvOutRow::from(record))?;
    }
    wrt.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_read_csv_current_layout() {
        let input = "date,sizeMM,quantity,type,remarks,pending,status\n\
                     2024-01-10,32,10,in,opening,false,Current\n\
                     2024-01-12,32,4,out,\"site A, pump 3\",true,Incoming\n";

        let records = read_csv(Cursor::new(input)).expect("read csv");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].movement, MovementType::Inward);
        assert_eq!(records[1].remarks, "site A, pump 3");
        assert!(records[1].pending);
        assert_eq!(records[1].status, StockStatus::Incoming);
    }

    #[test]
    fn test_read_csv_legacy_headers() {
        let input = "Date,Size (mm),Type,Quantity,Remarks\n\
                     2024-02-01,25,Inward,5,\n\
                     2024-02-03,25,Outgoing,2,repair\n";

        let records = read_csv(Cursor::new(input)).expect("read csv");

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].movement, MovementType::Outward);
        assert_eq!(records[1].quantity, 2);
        assert!(!records[0].pending);
        assert_eq!(records[0].status, StockStatus::Current);
    }

    #[test]
    fn test_read_csv_empty_input() {
        assert!(read_csv(Cursor::new("")).unwrap().is_empty());
        assert!(read_csv(Cursor::new("date,sizeMM,quantity,type,remarks\n")).unwrap().is_empty());
    }

    #[test]
    fn test_read_csv_rejects_unknown_type() {
        let input = "date,sizeMM,quantity,type\n2024-01-10,32,10,sideways\n";
        let err = read_csv(Cursor::new(input)).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_read_csv_rejects_zero_quantity() {
        let input = "date,sizeMM,quantity,type\n2024-01-10,32,0,in\n";
        let err = read_csv(Cursor::new(input)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_missing_required_column() {
        let err = HeaderMap::from_headers(["date", "sizeMM", "remarks"]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("quantity"));
        assert!(message.contains("type"));
    }

    #[test]
    fn test_parse_row_accepts_timestamp_and_float_quantity() {
        let map = HeaderMap::from_headers(COLUMNS).unwrap();
        let parsed = map
            .parse_row(2, &strings(&["2024-01-10 09:30:00", "32.0", "10.0", "IN", "", "", ""]))
            .expect("parse row");
        assert_eq!(parsed.len(), 1);
        let record = &parsed[0];

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(record.quantity, 10);
        assert_eq!(record.size_key(), "32");
    }

    #[test]
    fn test_read_csv_split_quantity_layout() {
        let input = "Date,Size (mm),Inward Qty,Outward Qty,Balance Qty,Remarks\n\
                     2024-01-05,32,10,0,10,\n\
                     2024-01-06,32,0,4,6,x\n\
                     2024-01-07,25,3,1,2,swap\n\
                     2024-01-08,25,0,0,2,note only\n";

        let records = read_csv(Cursor::new(input)).expect("read csv");

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].movement, MovementType::Inward);
        assert_eq!(records[0].quantity, 10);
        assert_eq!(records[1].movement, MovementType::Outward);
        assert_eq!(records[1].quantity, 4);
        assert_eq!(records[1].remarks, "x");
        assert_eq!(
            (records[2].movement, records[2].quantity),
            (MovementType::Inward, 3)
        );
        assert_eq!(
            (records[3].movement, records[3].quantity),
            (MovementType::Outward, 1)
        );
        assert_eq!(records[3].remarks, "swap");
    }

    #[test]
    fn test_split_layout_needs_date_and_size() {
        let err = HeaderMap::from_headers(["Date", "Inward Qty", "Outward Qty"]).unwrap_err();
        assert!(err.to_string().contains("sizeMM"));
        assert!(!err.to_string().contains("quantity"));
    }

    #[test]
    fn test_split_layout_rejects_bad_quantity() {
        let input = "Date,Size (mm),Inward Qty,Outward Qty\n2024-01-05,32,many,0\n";
        let err = read_csv(Cursor::new(input)).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("row 2: invalid quantity 'many'"));
    }

    #[test]
    fn test_read_csv_row_numbers_count_blank_lines() {
        let input = "date,sizeMM,quantity,type\n2024-01-10,32,10,in\n\n2024-01-11,32,ten,out\n";
        let err = read_csv(Cursor::new(input)).unwrap_err();
        assert!(err.to_string().contains("row 4: invalid quantity 'ten'"), "{}", err);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("7"), Ok(7));
        assert_eq!(parse_quantity("7.0"), Ok(7));
        assert!(parse_quantity("7.5").is_err());
        assert!(parse_quantity("-1").is_err());
        assert!(parse_quantity("seven").is_err());
    }

    #[test]
    fn test_write_csv_quotes_remarks() {
        let record = Record::new(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), "32", 10, MovementType::Inward)
            .unwrap()
            .with_remarks("line one\nline \"two\", end");

        let mut out = Vec::new();
        write_csv(&mut out, std::slice::from_ref(&record)).expect("write csv");
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("date,sizeMM,quantity,type,remarks,pending,status\n"));
        assert!(text.contains("\"line one\nline \"\"two\"\", end\""));

        let back = read_csv(Cursor::new(text)).expect("read back");
        assert_eq!(back, vec![record]);
    }

    #[test]
    fn test_write_csv_empty_ledger_has_header() {
        let mut out = Vec::new();
        write_csv(&mut out, &[]).expect("write csv");
        assert_eq!(String::from_utf8(out).unwrap(), "date,sizeMM,quantity,type,remarks,pending,status\n");
    }
}
