//! Query filter
//!
//! Every criterion is optional; the ones that are set are ANDed together.
//! Filtering never mutates the input and keeps the original order.

use crate::record::{canonical_size, Record, StockStatus};
use chrono::NaiveDate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub status: Option<StockStatus>,
    pub pending: Option<bool>,
    /// Compared by canonical size key
    pub size: Option<String>,
    /// Case-insensitive substring; blank means no constraint
    pub remarks: Option<String>,
    pub date: Option<NaiveDate>,
    /// Inclusive lower bound
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound
    pub date_to: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: StockStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = Some(pending);
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn remarks(mut self, needle: impl Into<String>) -> Self {
        self.remarks = Some(needle.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Blank (whitespace-only) means unset; otherwise matched as typed
    fn remarks_needle(&self) -> Option<String> {
        self.remarks
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_lowercase)
    }

    fn size_key(&self) -> Option<String> {
        self.size
            .as_deref()
            .map(canonical_size)
            .filter(|s| !s.is_empty())
    }

    /// True when no criterion constrains anything
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.pending.is_none()
            && self.size_key().is_none()
            && self.remarks_needle().is_none()
            && self.date.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.matches_with(record, self.size_key().as_deref(), self.remarks_needle().as_deref())
    }

    fn matches_with(&self, record: &Record, size_key: Option<&str>, needle: Option<&str>) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(pending) = self.pending {
            if record.pending != pending {
                return false;
            }
        }
        if let Some(key) = size_key {
            if record.size_key() != key {
                return false;
            }
        }
        if let Some(needle) = needle {
            if !record.remarks.to_lowercase().contains(needle) {
                return false;
            }
        }
        if let Some(date) = self.date {
            if record.date != date {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if record.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if record.date > to {
                return false;
            }
        }
        true
    }

    /// Matching records in original order
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        self.apply_indexed(records).into_iter().map(|(_, r)| r).collect()
    }

    /// Matching records with their store positions
    pub fn apply_indexed<'a>(&self, records: &'a [Record]) -> Vec<(usize, &'a Record)> {
        let size_key = self.size_key();
        let needle = self.remarks_needle();
        records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches_with(r, size_key.as_deref(), needle.as_deref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MovementType;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn record(day: u32, size: &str, status: StockStatus) -> Record {
        Record::new(date(day), size, 1, MovementType::Inward)
            .unwrap()
            .with_status(status)
    }

    #[test]
    fn test_status_filter_keeps_order() {
        let records = vec![
            record(1, "32", StockStatus::Current).with_remarks("first"),
            record(2, "32", StockStatus::Incoming),
            record(3, "25", StockStatus::Current).with_remarks("second"),
        ];

        let hits = RecordFilter::new().status(StockStatus::Current).apply(&records);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].remarks, "first");
        assert_eq!(hits[1].remarks, "second");
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let records = vec![
            record(1, "32", StockStatus::Current),
            record(2, "25", StockStatus::Incoming),
        ];

        let filter = RecordFilter::new().remarks("   ");
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&records).len(), 2);
    }

    #[test]
    fn test_remarks_needle_keeps_surrounding_spaces() {
        let records = vec![
            record(1, "32", StockStatus::Current).with_remarks("site pump 3"),
            record(2, "32", StockStatus::Current).with_remarks("pumped out"),
        ];

        let spaced = RecordFilter::new().remarks(" pump").apply(&records);
        assert_eq!(spaced.len(), 1);
        assert_eq!(spaced[0].remarks, "site pump 3");

        let plain = RecordFilter::new().remarks("pump").apply(&records);
        assert_eq!(plain.len(), 2);
    }

    #[test]
    fn test_remarks_case_insensitive_substring() {
        let records = vec![
            record(1, "32", StockStatus::Current).with_remarks("Returned by Kumar Pumps"),
            record(2, "32", StockStatus::Current).with_remarks(""),
        ];

        let hits = RecordFilter::new().remarks("kumar").apply(&records);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].date, date(1));
    }

    #[test]
    fn test_size_uses_canonical_key() {
        let records = vec![
            record(1, "32.0", StockStatus::Current),
            record(2, "25", StockStatus::Current),
            record(3, " 32", StockStatus::Current),
        ];

        let hits = RecordFilter::new().size("32").apply_indexed(&records);
        let positions: Vec<usize> = hits.iter().map(|(i, _)| *i).collect();
        assert_eq!(positions, vec![0, 2]);
    }

    #[test]
    fn test_criteria_are_conjunctive() {
        let records = vec![
            record(1, "32", StockStatus::Current).with_pending(true),
            record(1, "32", StockStatus::Current),
            record(2, "32", StockStatus::Current).with_pending(true),
        ];

        let hits = RecordFilter::new()
            .pending(true)
            .date(date(1))
            .apply_indexed(&records);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 0);
    }

    #[test]
    fn test_date_range_inclusive() {
        let records: Vec<Record> = (1..=5)
            .map(|d| record(d, "40", StockStatus::Current))
            .collect();

        let hits = RecordFilter::new()
            .between(Some(date(2)), Some(date(4)))
            .apply(&records);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits.first().map(|r| r.date), Some(date(2)));
        assert_eq!(hits.last().map(|r| r.date), Some(date(4)));

        let open_ended = RecordFilter::new().between(Some(date(4)), None).apply(&records);
        assert_eq!(open_ended.len(), 2);
    }

    #[test]
    fn test_no_match() {
        let records = vec![record(1, "32", StockStatus::Current)];
        let hits = RecordFilter::new().status(StockStatus::Incoming).apply(&records);
        assert!(hits.is_empty());
    }
}
