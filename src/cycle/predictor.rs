//! Cycle prediction
//!
//! Predictions anchor on the most recent logged period and project forward by
//! the average of the last few cycle lengths. Recent cycles describe near-term
//! behavior better than old ones.

use crate::cycle::config::PredictorConfig;
use crate::cycle::history::CycleHistory;
use crate::cycle::insight::cycle_insight;
use crate::cycle::types::{CyclePhase, CyclePrediction, CycleState, CycleStats, FertileWindow};
use crate::error::CycleError;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

/// Period length assumed for projected cycles when none can be averaged
const FALLBACK_PERIOD_LENGTH: f64 = 5.0;

/// Confidence reported while the default cycle length is in use
const DEFAULT_LENGTH_CONFIDENCE: f32 = 0.25;

/// Confidence reported with a single measured cycle
const SINGLE_CYCLE_CONFIDENCE: f32 = 0.5;

/// Cycle predictor holding its tuning constants
#[derive(Debug, Clone, Default)]
pub struct CyclePredictor {
    config: PredictorConfig,
}

impl CyclePredictor {
    pub fn new(config: PredictorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Average of the most recent cycle lengths, rounded to whole days.
    ///
    /// Falls back to the configured default with fewer than two entries.
    pub fn average_cycle_length(&self, history: &CycleHistory) -> u32 {
        let lengths = self.recent_cycle_lengths(history);
        if lengths.is_empty() {
            return self.config.default_cycle_length;
        }
        mean(&lengths).round() as u32
    }

    /// Build the cycle geometry for a cycle of `cycle_length` days whose
    /// period lasted `period_length` days.
    ///
    /// The ovulation day and the start of the fertile window are floored at
    /// day 1, so short cycles shrink the fertile window instead of pushing it
    /// to non-positive days.
    pub fn state_for(&self, cycle_length: u32, period_length: u32) -> CycleState {
        let cycle_length = cycle_length.max(1);
        let ovulation = cycle_length
            .saturating_sub(self.config.luteal_phase_days)
            .max(1);
        let fertile_start = ovulation
            .saturating_sub(self.config.fertile_window_days)
            .max(1);

        let period_days: BTreeSet<u32> = (1..=period_length).collect();
        let fertile_days: BTreeSet<u32> = (fertile_start..ovulation).collect();

        let mut state = CycleState {
            cycle_length_days: cycle_length,
            ovulation_offset_days: ovulation,
            period_days,
            fertile_days,
            phase: CyclePhase::Normal,
        };
        state.phase = state.classify(1);
        state
    }

    /// Predict the current phase and the next period for `today`.
    pub fn predict(
        &self,
        history: &CycleHistory,
        today: NaiveDate,
    ) -> Result<CyclePrediction, CycleError> {
        let last = history.last().ok_or(CycleError::NoHistory)?;
        let last_start = last.start_date();

        let elapsed = (today - last_start).num_days();
        if elapsed < 0 {
            return Err(CycleError::TodayBeforeLastPeriod { today, last_start });
        }

        let cycle_length = self.average_cycle_length(history);
        let mut state = self.state_for(cycle_length, last.period_length());

        let day_of_cycle = elapsed as u32 + 1;
        state.phase = state.classify(wrap_day(day_of_cycle, state.cycle_length_days));

        let next_period_date = shift_date(last_start, cycle_length as i64)?;
        let period_length = history
            .average_period_length(self.config.trailing_window)
            .unwrap_or(FALLBACK_PERIOD_LENGTH)
            .round()
            .max(1.0) as i64;
        let next_period_end = shift_date(next_period_date, period_length - 1)?;

        let ovulation_date = shift_date(last_start, state.ovulation_offset_days as i64 - 1)?;
        let fertile_window = match (state.fertile_days.first(), state.fertile_days.last()) {
            (Some(&first), Some(&last_day)) => Some(FertileWindow {
                start: shift_date(last_start, first as i64 - 1)?,
                end: shift_date(last_start, last_day as i64 - 1)?,
            }),
            _ => None,
        };

        let days_until_next_period = (next_period_date - today).num_days();
        let days_late = if days_until_next_period < 0 {
            days_until_next_period.unsigned_abs() as u32
        } else {
            0
        };

        let confidence = self.confidence(history);
        let insight = cycle_insight(&self.stats(history));

        Ok(CyclePrediction {
            state,
            day_of_cycle,
            last_period_start: last_start,
            next_period_date,
            next_period_end,
            ovulation_date,
            fertile_window,
            days_until_next_period,
            days_late,
            confidence,
            insight,
        })
    }

    /// Compute statistics over the whole history.
    pub fn stats(&self, history: &CycleHistory) -> CycleStats {
        let lengths = history.cycle_lengths();
        let entries = history.entries();

        CycleStats {
            total_cycles: entries.len(),
            avg_cycle_length: if lengths.is_empty() {
                None
            } else {
                Some(lengths.iter().sum::<i64>() as f32 / lengths.len() as f32)
            },
            avg_period_length: history
                .average_period_length(entries.len())
                .map(|avg| avg as f32),
            shortest_cycle: lengths.iter().copied().min(),
            longest_cycle: lengths.iter().copied().max(),
            last_period_start: history.last().map(|e| e.start_date()),
        }
    }

    /// Regularity of the trailing window: `1 - stddev/mean`
    fn confidence(&self, history: &CycleHistory) -> f32 {
        let lengths = self.recent_cycle_lengths(history);
        match lengths.len() {
            0 => DEFAULT_LENGTH_CONFIDENCE,
            1 => SINGLE_CYCLE_CONFIDENCE,
            _ => {
                let avg = mean(&lengths);
                (1.0 - (std_deviation(&lengths) / avg) as f32).clamp(0.1, 0.95)
            }
        }
    }

    fn recent_cycle_lengths(&self, history: &CycleHistory) -> Vec<f64> {
        let lengths = history.cycle_lengths();
        let window = self.config.trailing_window.max(1);
        lengths[lengths.len().saturating_sub(window)..]
            .iter()
            .map(|&days| days as f64)
            .collect()
    }
}

/// Move `date` by `days`, failing past the representable calendar
fn shift_date(date: NaiveDate, days: i64) -> Result<NaiveDate, CycleError> {
    date.checked_add_signed(Duration::days(days))
        .ok_or(CycleError::DateOutOfRange { date, days })
}

/// Fold a day of cycle past the cycle length back into `1..=cycle_length`
pub(crate) fn wrap_day(day_of_cycle: u32, cycle_length: u32) -> u32 {
    let cycle_length = cycle_length.max(1);
    (day_of_cycle.max(1) - 1) % cycle_length + 1
}

/// Average cycle length with the default configuration
pub fn average_cycle_length(history: &CycleHistory) -> u32 {
    CyclePredictor::default().average_cycle_length(history)
}

/// Predict with the default configuration
pub fn predict(history: &CycleHistory, today: NaiveDate) -> Result<CyclePrediction, CycleError> {
    CyclePredictor::default().predict(history, today)
}

/// Classify a day of cycle against a computed state
pub fn classify_day(state: &CycleState, day_of_cycle: u32) -> CyclePhase {
    state.classify(day_of_cycle)
}

/// Statistics with the default configuration
pub fn cycle_stats(history: &CycleHistory) -> CycleStats {
    CyclePredictor::default().stats(history)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
