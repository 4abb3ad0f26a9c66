//! Prediction defaults

use serde::{Deserialize, Serialize};

/// Cycle length assumed until at least two periods are logged
pub const DEFAULT_CYCLE_LENGTH_DAYS: u32 = 28;

/// Number of most recent cycles averaged for predictions
pub const DEFAULT_TRAILING_WINDOW: usize = 5;

/// Days from ovulation to the next period
pub const DEFAULT_LUTEAL_PHASE_DAYS: u32 = 14;

/// Fertile days preceding ovulation
pub const DEFAULT_FERTILE_WINDOW_DAYS: u32 = 5;

/// Longest period a logged entry may report
pub const MAX_PERIOD_LENGTH_DAYS: u32 = 15;

/// Tunable constants for `CyclePredictor`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub default_cycle_length: u32,
    pub trailing_window: usize,
    pub luteal_phase_days: u32,
    pub fertile_window_days: u32,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            default_cycle_length: DEFAULT_CYCLE_LENGTH_DAYS,
            trailing_window: DEFAULT_TRAILING_WINDOW,
            luteal_phase_days: DEFAULT_LUTEAL_PHASE_DAYS,
            fertile_window_days: DEFAULT_FERTILE_WINDOW_DAYS,
        }
    }
}

impl PredictorConfig {
    /// Load a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PredictorConfig::from_json(r#"{"trailing_window": 3}"#).unwrap();
        assert_eq!(config.trailing_window, 3);
        assert_eq!(config.default_cycle_length, 28);
        assert_eq!(config.luteal_phase_days, 14);
    }
}
