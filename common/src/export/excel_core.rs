//! Excel generation (shared core)
//!
//! Writes the ledger in the flat column layout defined in `schema.rs`, plus a
//! `Stock` sheet with net and available figures per size.

use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::{COLUMNS, DATE_FORMAT};
use crate::stock::{available_stock, net_stock, stock_for, StockOptions};
use rust_xlsxwriter::*;

pub const LEDGER_SHEET: &str = "Ledger";
pub const STOCK_SHEET: &str = "Stock";

const COLUMN_WIDTHS: [f64; 7] = [12.0, 10.0, 10.0, 8.0, 40.0, 9.0, 11.0];

/// Builds the workbook in memory
///
/// # Arguments
/// * `records` - ledger rows in store order
/// * `title` - document title stored in the workbook properties
/// * `with_stock_sheet` - append the per-size stock summary sheet
pub fn generate_ledger_workbook(
    records: &[Record],
    title: &str,
    with_stock_sheet: bool,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    workbook.set_properties(&DocProperties::new().set_title(title));

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(LEDGER_SHEET)
        .map_err(|e| Error::Export(format!("sheet name error: {}", e)))?;

    for (col, (name, width)) in COLUMNS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, *name, &header_format)
            .map_err(|e| Error::Export(format!("header write error: {}", e)))?;
        worksheet
            .set_column_width(col, width)
            .map_err(|e| Error::Export(format!("column width error: {}", e)))?;
    }
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| Error::Export(format!("freeze panes error: {}", e)))?;

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        let cell_err = |e: XlsxError| Error::Export(format!("row {} write error: {}", row, e));

        worksheet
            .write_string(row, 0, record.date.format(DATE_FORMAT).to_string())
            .map_err(cell_err)?;
        worksheet.write_string(row, 1, &record.size).map_err(cell_err)?;
        worksheet
            .write_number(row, 2, f64::from(record.quantity))
            .map_err(cell_err)?;
        worksheet
            .write_string(row, 3, record.movement.as_code())
            .map_err(cell_err)?;
        worksheet.write_string(row, 4, &record.remarks).map_err(cell_err)?;
        worksheet.write_boolean(row, 5, record.pending).map_err(cell_err)?;
        worksheet
            .write_string(row, 6, record.status.to_string())
            .map_err(cell_err)?;
    }

    if with_stock_sheet {
        write_stock_sheet(&mut workbook, records, &header_format)?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| Error::Export(format!("workbook save error: {}", e)))
}

fn write_stock_sheet(workbook: &mut Workbook, records: &[Record], header_format: &Format) -> Result<()> {
    let options = StockOptions::including_zero();
    let net = net_stock(records, options);
    let available = available_stock(records, options);

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(STOCK_SHEET)
        .map_err(|e| Error::Export(format!("sheet name error: {}", e)))?;

    for (col, name) in ["Size (mm)", "Net", "Available"].iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *name, header_format)
            .map_err(|e| Error::Export(format!("header write error: {}", e)))?;
    }

    for (i, level) in net.iter().enumerate() {
        let row = (i + 1) as u32;
        let cell_err = |e: XlsxError| Error::Export(format!("stock row {} write error: {}", row, e));
        let avail = stock_for(&available, &level.size).unwrap_or(0);

        worksheet.write_string(row, 0, &level.size).map_err(cell_err)?;
        worksheet
            .write_number(row, 1, level.quantity as f64)
            .map_err(cell_err)?;
        worksheet.write_number(row, 2, avail as f64).map_err(cell_err)?;
    }

    Ok(())
}
