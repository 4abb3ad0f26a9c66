//! Derived cycle types
//!
//! Everything in this module is recomputed on each prediction call and never
//! persisted by the core.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Classification of a single day of the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Period,
    Fertile,
    Ovulation,
    Normal,
}

impl CyclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePhase::Period => "period",
            CyclePhase::Fertile => "fertile",
            CyclePhase::Ovulation => "ovulation",
            CyclePhase::Normal => "normal",
        }
    }
}

/// Geometry of one cycle, expressed in 1-based days of cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleState {
    pub cycle_length_days: u32,
    /// Day of cycle on which ovulation is expected
    pub ovulation_offset_days: u32,
    pub period_days: BTreeSet<u32>,
    pub fertile_days: BTreeSet<u32>,
    /// Phase of the day the state was computed for
    pub phase: CyclePhase,
}

impl CycleState {
    /// Classify a day of this cycle.
    ///
    /// Period days win over ovulation, which wins over fertile days.
    pub fn classify(&self, day_of_cycle: u32) -> CyclePhase {
        if self.period_days.contains(&day_of_cycle) {
            CyclePhase::Period
        } else if day_of_cycle == self.ovulation_offset_days {
            CyclePhase::Ovulation
        } else if self.fertile_days.contains(&day_of_cycle) {
            CyclePhase::Fertile
        } else {
            CyclePhase::Normal
        }
    }
}

/// Calendar dates of the fertile window (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FertileWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Result of `CyclePredictor::predict`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CyclePrediction {
    #[serde(flatten)]
    pub state: CycleState,
    /// 1-based day of the current cycle for the reference date
    pub day_of_cycle: u32,
    pub last_period_start: NaiveDate,
    pub next_period_date: NaiveDate,
    pub next_period_end: NaiveDate,
    pub ovulation_date: NaiveDate,
    /// None when the cycle is too short to leave room for a fertile window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fertile_window: Option<FertileWindow>,
    /// Negative once the predicted date has passed
    pub days_until_next_period: i64,
    pub days_late: u32,
    /// 0.0 - 1.0, driven by how regular recent cycles have been
    pub confidence: f32,
    pub insight: String,
}

impl CyclePrediction {
    /// One-line summary suitable for a chat context or widget
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Day {} of {} ({} phase)",
            self.day_of_cycle,
            self.state.cycle_length_days,
            self.state.phase.as_str()
        );
        if self.days_late > 0 {
            summary.push_str(&format!(
                ", period {} day{} late",
                self.days_late,
                if self.days_late == 1 { "" } else { "s" }
            ));
        } else {
            summary.push_str(&format!(
                ", next period expected {}",
                self.next_period_date.format("%b %-d")
            ));
        }
        summary
    }
}

/// Aggregate statistics over the whole history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleStats {
    pub total_cycles: usize,
    pub avg_cycle_length: Option<f32>,
    pub avg_period_length: Option<f32>,
    pub shortest_cycle: Option<i64>,
    pub longest_cycle: Option<i64>,
    pub last_period_start: Option<NaiveDate>,
}

/// One day of a calendar view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day_of_cycle: u32,
    pub phase: CyclePhase,
    /// True when the day belongs to a cycle that has not been logged yet
    pub projected: bool,
}
