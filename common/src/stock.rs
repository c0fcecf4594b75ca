//! Stock aggregation
//!
//! Two figures are derived from the movement log, grouped by canonical size:
//! - net stock: inward minus outward over every record
//! - available stock: inward only, restricted to Current and non-pending records
//!
//! Output follows the order in which each size first appears in the input.
//! Negative totals are kept as-is (over-issued inventory).

use crate::record::{canonical_size, MovementType, Record, StockStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stock figure for one size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    /// Canonical size key
    pub size: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockOptions {
    /// Keep sizes whose total is exactly zero
    pub include_zero: bool,
}

impl StockOptions {
    pub fn including_zero() -> Self {
        Self { include_zero: true }
    }
}

/// Sums `contribution` per size in first-appearance order
fn group_sum<F>(records: &[Record], options: StockOptions, contribution: F) -> Vec<StockLevel>
where
    F: Fn(&Record) -> i64,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut levels: Vec<StockLevel> = Vec::new();

    for record in records {
        let key = record.size_key();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            levels.push(StockLevel { size: key, quantity: 0 });
            levels.len() - 1
        });
        levels[slot].quantity += contribution(record);
    }

    if !options.include_zero {
        levels.retain(|l| l.quantity != 0);
    }
    levels
}

/// Inward minus outward per size, regardless of status or pending
pub fn net_stock(records: &[Record], options: StockOptions) -> Vec<StockLevel> {
    group_sum(records, options, Record::signed_quantity)
}

/// Confirmed on-hand quantity per size
///
/// Only Inward records with status Current and `pending == false` count.
pub fn available_stock(records: &[Record], options: StockOptions) -> Vec<StockLevel> {
    group_sum(records, options, |r| {
        if r.movement == MovementType::Inward && r.status == StockStatus::Current && !r.pending {
            i64::from(r.quantity)
        } else {
            0
        }
    })
}

/// Cumulative net quantity of each record's size, up to and including that record
pub fn running_balance(records: &[Record]) -> Vec<i64> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    records
        .iter()
        .map(|r| {
            let total = totals.entry(r.size_key()).or_insert(0);
            *total += r.signed_quantity();
            *total
        })
        .collect()
}

/// Looks up a size (any spelling) in an aggregation result
pub fn stock_for(levels: &[StockLevel], size: &str) -> Option<i64> {
    let key = canonical_size(size);
    levels.iter().find(|l| l.size == key).map(|l| l.quantity)
}
