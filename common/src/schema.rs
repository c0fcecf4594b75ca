//! Flat ledger layout shared by the file backends and exports
//!
//! Column order: date, sizeMM, quantity, type, remarks, pending, status.
//! The first five match the older flat-file layout; pending and status
//! are trailing extensions that older files may omit.

pub const COL_DATE: &str = "date";
pub const COL_SIZE: &str = "sizeMM";
pub const COL_QUANTITY: &str = "quantity";
pub const COL_TYPE: &str = "type";
pub const COL_REMARKS: &str = "remarks";
pub const COL_PENDING: &str = "pending";
pub const COL_STATUS: &str = "status";

/// Split-quantity columns of the auto-save workbook; read only, never written
pub const COL_INWARD_QTY: &str = "inwardQty";
pub const COL_OUTWARD_QTY: &str = "outwardQty";

pub const COLUMNS: [&str; 7] = [
    COL_DATE,
    COL_SIZE,
    COL_QUANTITY,
    COL_TYPE,
    COL_REMARKS,
    COL_PENDING,
    COL_STATUS,
];

/// ISO-8601 calendar date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Header spellings used by the spreadsheet-era layouts
///
/// `Balance Qty` is derived and has no entry, so it is ignored on load.
pub const LEGACY_HEADERS: [(&str, &str); 7] = [
    ("Date", COL_DATE),
    ("Size (mm)", COL_SIZE),
    ("Quantity", COL_QUANTITY),
    ("Type", COL_TYPE),
    ("Remarks", COL_REMARKS),
    ("Inward Qty", COL_INWARD_QTY),
    ("Outward Qty", COL_OUTWARD_QTY),
];

/// Maps a header cell onto its canonical column name
pub fn canonical_header(header: &str) -> Option<&'static str> {
    let header = header.trim();
    if let Some(col) = COLUMNS.iter().copied().find(|c| c.eq_ignore_ascii_case(header)) {
        return Some(col);
    }
    LEGACY_HEADERS
        .iter()
        .find(|(legacy, _)| legacy.eq_ignore_ascii_case(header))
        .map(|(_, col)| *col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_header() {
        assert_eq!(canonical_header("sizeMM"), Some(COL_SIZE));
        assert_eq!(canonical_header("SIZEMM"), Some(COL_SIZE));
        assert_eq!(canonical_header("Size (mm)"), Some(COL_SIZE));
        assert_eq!(canonical_header(" Type "), Some(COL_TYPE));
        assert_eq!(canonical_header("inward qty"), Some(COL_INWARD_QTY));
        assert_eq!(canonical_header("Outward Qty"), Some(COL_OUTWARD_QTY));
        assert_eq!(canonical_header("Balance Qty"), None);
    }
}
