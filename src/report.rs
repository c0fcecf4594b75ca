//! Plain-text tables for the terminal

use rotor_ledger_common::{Record, StockLevel};
use std::fmt::Write;

/// Movement log table
///
/// # Arguments
/// * `rows` - (store position, record) pairs, already filtered
/// * `balances` - running balance per store position, when the column is wanted
pub fn format_ledger(rows: &[(usize, &Record)], balances: Option<&[i64]>) -> String {
    if rows.is_empty() {
        return "No entries to display.\n".to_string();
    }

    let mut out = String::new();
    let _ = write!(
        out,
        "{:>4}  {:<10}  {:>9}  {:>5}  {:<7}  {:<8}  {:<7}",
        "#", "Date", "Size (mm)", "Qty", "Type", "Status", "Pending"
    );
    if balances.is_some() {
        let _ = write!(out, "  {:>7}", "Balance");
    }
    let _ = writeln!(out, "  Remarks");

    for (position, record) in rows {
        let _ = write!(
            out,
            "{:>4}  {:<10}  {:>9}  {:>5}  {:<7}  {:<8}  {:<7}",
            position,
            record.date.to_string(),
            record.size.trim(),
            record.quantity,
            record.movement.to_string(),
            record.status.to_string(),
            if record.pending { "yes" } else { "no" },
        );
        if let Some(balances) = balances {
            let balance = balances.get(*position).copied().unwrap_or_default();
            let _ = write!(out, "  {:>7}", balance);
        }
        let _ = writeln!(out, "  {}", record.remarks.replace('\n', " "));
    }
    out
}

/// Orders rows by date, keeping store order within a day
pub fn sort_by_date(rows: &mut [(usize, &Record)]) {
    rows.sort_by_key(|(_, record)| record.date);
}

/// Per-size stock table
pub fn format_stock(levels: &[StockLevel], heading: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading);

    if levels.is_empty() {
        let _ = writeln!(out, "No data available yet.");
        return out;
    }

    let _ = writeln!(out, "{:>9}  {:>8}", "Size (mm)", "Quantity");
    for level in levels {
        let _ = writeln!(out, "{:>9}  {:>8}", level.size, level.quantity);
    }
    out
}
