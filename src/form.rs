//! Interactive entry form
//!
//! Terminal equivalent of the movement entry form: prompts for each field,
//! appends through the session (which saves immediately) and offers to add
//! another entry.

use crate::error::{LedgerError, Result};
use crate::persistence::PersistenceAdapter;
use crate::session::LedgerSession;
use chrono::{Local, NaiveDate};
use dialoguer::{Confirm, Input, Select};
use rotor_ledger_common::{MovementType, Record, StockStatus};
use std::collections::HashSet;

/// Sizes already in the ledger, first-appearance order, shown as hints
pub fn collect_existing_sizes(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(Record::size_key)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

fn prompt_err(e: dialoguer::Error) -> LedgerError {
    LedgerError::Prompt(e.to_string())
}

/// Asks for one record; `defaults` pre-fills the fields (used by edit)
pub fn prompt_record(size_hints: &[String], defaults: Option<&Record>) -> Result<Record> {
    if !size_hints.is_empty() {
        println!("  Known sizes: {}", size_hints.join(", "));
    }

    let date: NaiveDate = Input::new()
        .with_prompt("Date (YYYY-MM-DD)")
        .default(defaults.map(|r| r.date).unwrap_or_else(|| Local::now().date_naive()))
        .interact_text()
        .map_err(prompt_err)?;

    let mut size_input = Input::<String>::new()
        .with_prompt("Rotor size (mm)")
        .validate_with(|s: &String| {
            if s.trim().is_empty() {
                Err("size must not be empty")
            } else {
                Ok(())
            }
        });
    if let Some(r) = defaults {
        size_input = size_input.default(r.size.clone());
    }
    let size = size_input.interact_text().map_err(prompt_err)?;

    let mut quantity_input = Input::<u32>::new()
        .with_prompt("Quantity")
        .validate_with(|q: &u32| if *q >= 1 { Ok(()) } else { Err("quantity must be at least 1") });
    if let Some(r) = defaults {
        quantity_input = quantity_input.default(r.quantity);
    }
    let quantity = quantity_input.interact_text().map_err(prompt_err)?;

    let movements = [MovementType::Inward, MovementType::Outward];
    let movement_idx = Select::new()
        .with_prompt("Entry type")
        .items(&["Inward", "Outward"])
        .default(defaults.map_or(0, |r| if r.movement == MovementType::Inward { 0 } else { 1 }))
        .interact()
        .map_err(prompt_err)?;

    let statuses = [StockStatus::Current, StockStatus::Incoming];
    let status_idx = Select::new()
        .with_prompt("Status")
        .items(&["Current", "Incoming"])
        .default(defaults.map_or(0, |r| if r.status == StockStatus::Current { 0 } else { 1 }))
        .interact()
        .map_err(prompt_err)?;

    let pending = Confirm::new()
        .with_prompt("Pending (not yet received)?")
        .default(defaults.map_or(false, |r| r.pending))
        .interact()
        .map_err(prompt_err)?;

    let remarks: String = Input::new()
        .with_prompt("Remarks")
        .default(defaults.map(|r| r.remarks.clone()).unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let record = Record::new(date, size, quantity, movements[movement_idx])?
        .with_status(statuses[status_idx])
        .with_pending(pending)
        .with_remarks(remarks);
    Ok(record)
}

/// Runs the entry form until the user stops; returns the number of entries added
pub fn run_entry_form<A: PersistenceAdapter>(session: &mut LedgerSession<A>) -> Result<usize> {
    let mut added = 0;

    loop {
        let hints = collect_existing_sizes(session.records());
        let record = prompt_record(&hints, None)?;
        let position = session.append(record)?;
        added += 1;
        println!("✔ Entry #{} added and saved\n", position);

        let again = Confirm::new()
            .with_prompt("Add another entry?")
            .default(false)
            .interact()
            .map_err(prompt_err)?;
        if !again {
            break;
        }
    }

    Ok(added)
}
