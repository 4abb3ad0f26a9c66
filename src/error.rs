//! Error types for Bloom Core

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while validating or predicting cycle data
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("No cycle history recorded yet")]
    NoHistory,

    #[error("Invalid cycle entry starting {start_date}: {reason}")]
    InvalidCycleEntry { start_date: NaiveDate, reason: String },

    #[error("Reference date {today} is before the last period start {last_start}")]
    TodayBeforeLastPeriod { today: NaiveDate, last_start: NaiveDate },

    #[error("Date {date} shifted by {days} days is out of range")]
    DateOutOfRange { date: NaiveDate, days: i64 },

    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("Date parse error: {0}")]
    DateParse(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
