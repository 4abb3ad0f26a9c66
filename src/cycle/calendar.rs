//! Per-day calendar classification
//!
//! Each date is anchored on the latest logged period starting on or before it.
//! Completed cycles use their real length; the open cycle and the projected
//! cycles after it use the predicted length.

use crate::cycle::history::CycleHistory;
use crate::cycle::predictor::{wrap_day, CyclePredictor};
use crate::cycle::types::CalendarDay;
use crate::error::CycleError;
use chrono::NaiveDate;

impl CyclePredictor {
    /// Classify every date in `from..=to`. Dates before the first logged
    /// period are omitted.
    pub fn calendar(
        &self,
        history: &CycleHistory,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CalendarDay>, CycleError> {
        if from > to {
            return Err(CycleError::InvalidRange { from, to });
        }
        if history.is_empty() {
            return Err(CycleError::NoHistory);
        }

        let entries = history.entries();
        let predicted_length = self.average_cycle_length(history);
        let projected_period = history
            .average_period_length(self.config().trailing_window)
            .map(|avg| (avg.round() as u32).max(1))
            .unwrap_or(1);

        let mut days = Vec::new();
        for date in from.iter_days().take_while(|d| *d <= to) {
            let idx = entries.partition_point(|e| e.start_date() <= date);
            if idx == 0 {
                continue;
            }
            let anchor = &entries[idx - 1];
            let elapsed = (date - anchor.start_date()).num_days() as u32;

            let day = match entries.get(idx) {
                Some(next) => {
                    let length = (next.start_date() - anchor.start_date()).num_days() as u32;
                    let state = self.state_for(length, anchor.period_length());
                    let day_of_cycle = elapsed + 1;
                    CalendarDay {
                        date,
                        day_of_cycle,
                        phase: state.classify(day_of_cycle),
                        projected: false,
                    }
                }
                None => {
                    let projected = elapsed >= predicted_length;
                    let period_length = if projected {
                        projected_period
                    } else {
                        anchor.period_length()
                    };
                    let state = self.state_for(predicted_length, period_length);
                    let day_of_cycle = wrap_day(elapsed + 1, predicted_length);
                    CalendarDay {
                        date,
                        day_of_cycle,
                        phase: state.classify(day_of_cycle),
                        projected,
                    }
                }
            };
            days.push(day);
        }

        Ok(days)
    }
}

/// Calendar with the default configuration
pub fn calendar(
    history: &CycleHistory,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<CalendarDay>, CycleError> {
    CyclePredictor::default().calendar(history, from, to)
}
