//! Recorded cycle entries
//!
//! A `CycleEntry` is one logged period: the day it started and how many days
//! it lasted. A `CycleHistory` is the validated, chronological list of entries
//! a prediction is computed from. Both reject bad data at construction time so
//! the prediction math never sees a zero-length period or out-of-order dates.

use crate::cycle::config::MAX_PERIOD_LENGTH_DAYS;
use crate::error::CycleError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One logged period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CycleEntryRecord")]
pub struct CycleEntry {
    start_date: NaiveDate,
    period_length: u32,
}

/// Unvalidated wire form of a `CycleEntry`
#[derive(Debug, Deserialize)]
struct CycleEntryRecord {
    start_date: NaiveDate,
    period_length: u32,
}

impl TryFrom<CycleEntryRecord> for CycleEntry {
    type Error = CycleError;

    fn try_from(record: CycleEntryRecord) -> Result<Self, Self::Error> {
        CycleEntry::new(record.start_date, record.period_length)
    }
}

impl CycleEntry {
    /// Create an entry, rejecting a period of zero days or longer than
    /// `MAX_PERIOD_LENGTH_DAYS`
    pub fn new(start_date: NaiveDate, period_length: u32) -> Result<Self, CycleError> {
        if period_length == 0 {
            return Err(CycleError::InvalidCycleEntry {
                start_date,
                reason: "period length must be at least 1 day".to_string(),
            });
        }
        if period_length > MAX_PERIOD_LENGTH_DAYS {
            return Err(CycleError::InvalidCycleEntry {
                start_date,
                reason: format!(
                    "period length of {} days exceeds the maximum of {}",
                    period_length, MAX_PERIOD_LENGTH_DAYS
                ),
            });
        }
        Ok(Self {
            start_date,
            period_length,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn period_length(&self) -> u32 {
        self.period_length
    }
}

/// Chronologically ordered cycle entries with strictly increasing start dates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CycleEntry>", into = "Vec<CycleEntry>")]
pub struct CycleHistory {
    entries: Vec<CycleEntry>,
}

impl TryFrom<Vec<CycleEntry>> for CycleHistory {
    type Error = CycleError;

    fn try_from(entries: Vec<CycleEntry>) -> Result<Self, Self::Error> {
        CycleHistory::new(entries)
    }
}

impl From<CycleHistory> for Vec<CycleEntry> {
    fn from(history: CycleHistory) -> Self {
        history.entries
    }
}

impl CycleHistory {
    /// Build a history from entries that are already in chronological order.
    ///
    /// Returns `InvalidCycleEntry` for the first entry whose start date is not
    /// strictly after its predecessor.
    pub fn new(entries: Vec<CycleEntry>) -> Result<Self, CycleError> {
        for pair in entries.windows(2) {
            if pair[1].start_date <= pair[0].start_date {
                return Err(CycleError::InvalidCycleEntry {
                    start_date: pair[1].start_date,
                    reason: format!(
                        "start date must be after the previous entry ({})",
                        pair[0].start_date
                    ),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Build a history from entries in any order. Duplicate start dates are
    /// still rejected.
    pub fn from_unsorted(mut entries: Vec<CycleEntry>) -> Result<Self, CycleError> {
        entries.sort_by_key(|e| e.start_date);
        Self::new(entries)
    }

    /// Append an entry that starts after the current last entry
    pub fn push(&mut self, entry: CycleEntry) -> Result<(), CycleError> {
        if let Some(last) = self.entries.last() {
            if entry.start_date <= last.start_date {
                return Err(CycleError::InvalidCycleEntry {
                    start_date: entry.start_date,
                    reason: format!(
                        "start date must be after the previous entry ({})",
                        last.start_date
                    ),
                });
            }
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[CycleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry, the anchor for predictions
    pub fn last(&self) -> Option<&CycleEntry> {
        self.entries.last()
    }

    /// Day counts between consecutive start dates, oldest first
    pub fn cycle_lengths(&self) -> Vec<i64> {
        self.entries
            .windows(2)
            .map(|w| (w[1].start_date - w[0].start_date).num_days())
            .collect()
    }

    /// Mean period length over the most recent `window` entries
    pub fn average_period_length(&self, window: usize) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let recent = &self.entries[self.entries.len().saturating_sub(window.max(1))..];
        let total: u64 = recent.iter().map(|e| u64::from(e.period_length)).sum();
        Some(total as f64 / recent.len() as f64)
    }

    /// Parse a JSON array of entries
    pub fn parse_array(json: &str) -> Result<Self, CycleError> {
        let entries: Vec<CycleEntry> = serde_json::from_str(json)?;
        Self::from_unsorted(entries)
    }

    /// Parse newline-delimited JSON, one entry per line. Blank lines are skipped.
    pub fn parse_ndjson(ndjson: &str) -> Result<Self, CycleError> {
        let mut entries = Vec::new();
        for line in ndjson.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            entries.push(serde_json::from_str::<CycleEntry>(trimmed)?);
        }
        Self::from_unsorted(entries)
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, CycleError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| CycleError::DateParse(format!("{}: {}", value, e)))
}
