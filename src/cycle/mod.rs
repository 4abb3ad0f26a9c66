//! Menstrual-cycle prediction
//!
//! Derives the current phase, fertile window, ovulation day and next-period
//! date from a history of logged periods.
//!
//! Pipeline: CycleHistory → CyclePredictor → CyclePrediction / CalendarDay

pub mod calendar;
pub mod config;
pub mod history;
pub mod insight;
pub mod predictor;
pub mod types;

pub use calendar::calendar;
pub use config::{PredictorConfig, MAX_PERIOD_LENGTH_DAYS};
pub use history::{parse_date, CycleEntry, CycleHistory};
pub use insight::{cycle_insight, phase_tip};
pub use predictor::{average_cycle_length, classify_day, cycle_stats, predict, CyclePredictor};
pub use types::{CalendarDay, CyclePhase, CyclePrediction, CycleState, CycleStats, FertileWindow};
