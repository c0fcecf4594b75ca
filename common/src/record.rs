//! Ledger record types
//!
//! - Record: one inward/outward movement of a rotor size
//! - MovementType / StockStatus: the canonical enums every backend spelling maps onto
//! - canonical_size: the grouping key used by aggregation and filters

use crate::error::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    Inward,
    Outward,
}

impl MovementType {
    /// Short code used by the flat-file layout (`in` / `out`)
    pub fn as_code(&self) -> &'static str {
        match self {
            MovementType::Inward => "in",
            MovementType::Outward => "out",
        }
    }

    /// +1 for inward, -1 for outward
    pub fn sign(&self) -> i64 {
        match self {
            MovementType::Inward => 1,
            MovementType::Outward => -1,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementType::Inward => write!(f, "Inward"),
            MovementType::Outward => write!(f, "Outward"),
        }
    }
}

impl FromStr for MovementType {
    type Err = Error;

    /// Accepts `in`/`out`, `Inward`/`Outward` and `Outgoing` (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "in" | "inward" => Ok(MovementType::Inward),
            "out" | "outward" | "outgoing" => Ok(MovementType::Outward),
            other => Err(Error::Validation(format!(
                "unknown movement type '{}' (expected in/out)",
                other
            ))),
        }
    }
}

/// Whether the rotors are on hand or still on their way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StockStatus {
    #[default]
    Current,
    Incoming,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::Current => write!(f, "Current"),
            StockStatus::Incoming => write!(f, "Incoming"),
        }
    }
}

impl FromStr for StockStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "current" => Ok(StockStatus::Current),
            "incoming" | "coming" | "coming rotors" => Ok(StockStatus::Incoming),
            other => Err(Error::Validation(format!(
                "unknown stock status '{}' (expected Current/Incoming)",
                other
            ))),
        }
    }
}

/// Canonical grouping key for a rotor size
///
/// Trims whitespace and drops an all-zero fraction and a leading `+` from
/// numeric values, so `"32"`, `" 32 "`, `"+32"` and `"32.0"` land in the
/// same group. Any spelling of zero becomes `"0"`.
pub fn canonical_size(raw: &str) -> String {
    lazy_static::lazy_static! {
        static ref WHOLE_NUMBER_RE: Regex = Regex::new(r"^([+-]?)(\d+)(?:\.0+)?$").unwrap();
    }

    let trimmed = raw.trim();
    match WHOLE_NUMBER_RE.captures(trimmed) {
        Some(caps) => {
            let digits = &caps[2];
            if digits.bytes().all(|b| b == b'0') {
                "0".to_string()
            } else if &caps[1] == "-" {
                format!("-{}", digits)
            } else {
                digits.to_string()
            }
        }
        None => trimmed.to_string(),
    }
}

/// One ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub date: NaiveDate,

    /// Rotor size in mm, kept as entered
    pub size: String,

    pub quantity: u32,

    pub movement: MovementType,

    /// Recorded but not yet physically confirmed
    #[serde(default)]
    pub pending: bool,

    #[serde(default)]
    pub status: StockStatus,

    #[serde(default)]
    pub remarks: String,
}

impl Record {
    /// Builds a validated record with default status (Current, not pending)
    pub fn new(
        date: NaiveDate,
        size: impl Into<String>,
        quantity: u32,
        movement: MovementType,
    ) -> Result<Self> {
        let record = Self {
            date,
            size: size.into(),
            quantity,
            movement,
            pending: false,
            status: StockStatus::Current,
            remarks: String::new(),
        };
        record.validate()?;
        Ok(record)
    }

    pub fn with_pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    pub fn with_status(mut self, status: StockStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = remarks.into();
        self
    }

    /// Checks the record invariants
    pub fn validate(&self) -> Result<()> {
        if self.quantity == 0 {
            return Err(Error::Validation("quantity must be at least 1".into()));
        }
        if self.size.trim().is_empty() {
            return Err(Error::Validation("rotor size must not be empty".into()));
        }
        Ok(())
    }

    pub fn size_key(&self) -> String {
        canonical_size(&self.size)
    }

    /// Quantity with the movement sign applied
    pub fn signed_quantity(&self) -> i64 {
        self.movement.sign() * i64::from(self.quantity)
    }
}
