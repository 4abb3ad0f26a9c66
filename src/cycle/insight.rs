//! Human-readable cycle text: per-phase tips and cycle-health insight

use crate::cycle::config::DEFAULT_CYCLE_LENGTH_DAYS;
use crate::cycle::types::{CyclePhase, CycleStats};

/// Shortest average cycle length considered typical
pub const TYPICAL_CYCLE_MIN_DAYS: f32 = 21.0;

/// Longest average cycle length considered typical
pub const TYPICAL_CYCLE_MAX_DAYS: f32 = 35.0;

/// Spread between shortest and longest cycle above which cycles are irregular
pub const IRREGULAR_SPREAD_DAYS: i64 = 7;

const PHASE_TIPS: [(CyclePhase, &str); 4] = [
    (
        CyclePhase::Period,
        "Your period is here. Stay hydrated, rest when you need to, and try gentle movement like walking or stretching to ease cramps.",
    ),
    (
        CyclePhase::Fertile,
        "You're in your fertile window. Energy is often higher now, a good time for more intense workouts.",
    ),
    (
        CyclePhase::Ovulation,
        "Ovulation day is predicted today. Some people notice mild one-sided cramps or a rise in body temperature.",
    ),
    (
        CyclePhase::Normal,
        "Nothing special predicted today. Keep up your regular routine and listen to your body.",
    ),
];

/// Tip shown for a phase. One fixed message per phase.
pub fn phase_tip(phase: CyclePhase) -> &'static str {
    PHASE_TIPS
        .iter()
        .find(|(p, _)| *p == phase)
        .map(|(_, tip)| *tip)
        .unwrap_or_default()
}

/// Describe how healthy the recorded cycles look.
pub fn cycle_insight(stats: &CycleStats) -> String {
    if stats.total_cycles == 0 {
        return "Log your first period to start tracking your cycle.".to_string();
    }

    let Some(avg) = stats.avg_cycle_length else {
        return format!(
            "Log at least one more period so we can learn your cycle length. Until then predictions assume a {}-day cycle.",
            DEFAULT_CYCLE_LENGTH_DAYS
        );
    };

    let days = avg.round() as i64;
    let mut insight = if avg < TYPICAL_CYCLE_MIN_DAYS {
        format!(
            "Your average cycle is {} days, shorter than the typical 21-35 day range. Consider mentioning this to your doctor if it continues.",
            days
        )
    } else if avg > TYPICAL_CYCLE_MAX_DAYS {
        format!(
            "Your average cycle is {} days, longer than the typical 21-35 day range. Consider mentioning this to your doctor if it continues.",
            days
        )
    } else {
        format!(
            "Your average cycle is {} days, well within the typical 21-35 day range.",
            days
        )
    };

    if let (Some(shortest), Some(longest)) = (stats.shortest_cycle, stats.longest_cycle) {
        let spread = longest - shortest;
        if spread > IRREGULAR_SPREAD_DAYS {
            insight.push_str(&format!(
                " Your cycle length varies by {} days, so predictions may be less precise.",
                spread
            ));
        }
    }

    insight
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(avg: Option<f32>, shortest: Option<i64>, longest: Option<i64>) -> CycleStats {
        CycleStats {
            total_cycles: 3,
            avg_cycle_length: avg,
            avg_period_length: Some(5.0),
            shortest_cycle: shortest,
            longest_cycle: longest,
            last_period_start: None,
        }
    }

    #[test]
    fn test_every_phase_has_a_tip() {
        for phase in [
            CyclePhase::Period,
            CyclePhase::Fertile,
            CyclePhase::Ovulation,
            CyclePhase::Normal,
        ] {
            assert!(!phase_tip(phase).is_empty());
        }
        assert!(phase_tip(CyclePhase::Period).starts_with("Your period is here."));
    }

    #[test]
    fn test_insight_without_cycles() {
        let empty = CycleStats {
            total_cycles: 0,
            ..stats(None, None, None)
        };
        assert_eq!(
            cycle_insight(&empty),
            "Log your first period to start tracking your cycle."
        );

        let one = CycleStats {
            total_cycles: 1,
            ..stats(None, None, None)
        };
        assert!(cycle_insight(&one).contains("28-day cycle"));
    }

    #[test]
    fn test_insight_bands() {
        assert!(cycle_insight(&stats(Some(19.0), Some(18), Some(20))).contains("shorter than"));
        assert!(cycle_insight(&stats(Some(28.4), Some(27), Some(30))).contains("well within"));
        assert!(cycle_insight(&stats(Some(40.0), Some(39), Some(41))).contains("longer than"));
    }

    #[test]
    fn test_insight_flags_irregular_cycles() {
        let insight = cycle_insight(&stats(Some(30.0), Some(24), Some(36)));
        assert!(insight.contains("varies by 12 days"));

        let regular = cycle_insight(&stats(Some(28.0), Some(27), Some(29)));
        assert!(!regular.contains("varies"));
    }
}
