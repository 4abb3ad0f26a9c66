//! Conversation inputs and carry-over state
//!
//! `ChatContext` is a read-only snapshot of the user's day, assembled by the
//! host from its own logs. `ChatMemory` is the only state that survives from
//! one reply to the next.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest mind score treated as real data
pub const MIN_MIND_SCORE: i32 = 1;

/// Highest mind score treated as real data
pub const MAX_MIND_SCORE: i32 = 100;

/// Daily metrics summarized in a `ChatContext`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Water,
    Sleep,
    Workout,
    Mood,
    Period,
    Calories,
    Meditation,
    Tasks,
}

impl Metric {
    /// All metrics in display order
    pub const ALL: [Metric; 8] = [
        Metric::Water,
        Metric::Sleep,
        Metric::Workout,
        Metric::Mood,
        Metric::Period,
        Metric::Calories,
        Metric::Meditation,
        Metric::Tasks,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Water => "Water",
            Metric::Sleep => "Sleep",
            Metric::Workout => "Workout",
            Metric::Mood => "Mood",
            Metric::Period => "Cycle",
            Metric::Calories => "Calories",
            Metric::Meditation => "Meditation",
            Metric::Tasks => "Tasks",
        }
    }
}

/// Snapshot of the user's wellness metrics for one reply.
///
/// Each metric is a pre-formatted summary (e.g. "6 of 8 glasses"). `None` or a
/// blank string means nothing was logged today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatContext {
    pub user_name: String,
    /// Raw mind score; only 1-100 counts as a score
    pub mind_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meditation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<String>,
}

impl ChatContext {
    /// Create an empty context for a user
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            ..Default::default()
        }
    }

    /// Load a context from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Mind score when it lies in 1-100. Zero and out-of-range values mean
    /// no score has been computed.
    pub fn valid_mind_score(&self) -> Option<i32> {
        (MIN_MIND_SCORE..=MAX_MIND_SCORE)
            .contains(&self.mind_score)
            .then_some(self.mind_score)
    }

    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        let name = self.user_name.trim();
        if name.is_empty() {
            "there"
        } else {
            name
        }
    }

    /// Logged summary for a metric, if any
    pub fn metric(&self, metric: Metric) -> Option<&str> {
        let value = match metric {
            Metric::Water => &self.water,
            Metric::Sleep => &self.sleep,
            Metric::Workout => &self.workout,
            Metric::Mood => &self.mood,
            Metric::Period => &self.period,
            Metric::Calories => &self.calories,
            Metric::Meditation => &self.meditation,
            Metric::Tasks => &self.tasks,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Metrics with nothing logged, in display order
    pub fn missing_metrics(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|m| self.metric(*m).is_none())
            .collect()
    }
}

/// State carried between consecutive replies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMemory {
    /// Newline-joined proactive suggestions from the previous reply
    pub last_suggestion: String,
}

impl ChatMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `suggestion` was part of the previous suggestion set
    pub fn recently_suggested(&self, suggestion: &str) -> bool {
        self.last_suggestion.lines().any(|line| line == suggestion)
    }
}

/// One conversation: an identifier plus its carry-over memory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub started_at_utc: DateTime<Utc>,
    pub turns: u32,
    pub memory: ChatMemory,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at_utc: Utc::now(),
            turns: 0,
            memory: ChatMemory::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mind_score_validity() {
        let mut ctx = ChatContext::new("Sam");
        for (score, expected) in [
            (0, None),
            (-5, None),
            (101, None),
            (1, Some(1)),
            (100, Some(100)),
            (64, Some(64)),
        ] {
            ctx.mind_score = score;
            assert_eq!(ctx.valid_mind_score(), expected, "score {score}");
        }
    }

    #[test]
    fn test_blank_metric_counts_as_missing() {
        let ctx = ChatContext {
            water: Some("   ".to_string()),
            sleep: Some(" 7h 30m ".to_string()),
            ..ChatContext::new("Sam")
        };
        assert_eq!(ctx.metric(Metric::Water), None);
        assert_eq!(ctx.metric(Metric::Sleep), Some("7h 30m"));
        assert_eq!(ctx.missing_metrics().len(), 7);
        assert_eq!(ctx.missing_metrics()[0], Metric::Water);
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(ChatContext::new("  ").display_name(), "there");
        assert_eq!(ChatContext::new("Sam").display_name(), "Sam");
    }

    #[test]
    fn test_context_from_partial_json() {
        let ctx = ChatContext::from_json(r#"{"user_name": "Ana", "water": "3 glasses"}"#).unwrap();
        assert_eq!(ctx.user_name, "Ana");
        assert_eq!(ctx.mind_score, 0);
        assert_eq!(ctx.metric(Metric::Water), Some("3 glasses"));
    }

    #[test]
    fn test_recently_suggested_matches_whole_lines() {
        let memory = ChatMemory {
            last_suggestion: "Drink water.\nLog sleep.".to_string(),
        };
        assert!(memory.recently_suggested("Log sleep."));
        assert!(!memory.recently_suggested("Drink"));
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        assert_ne!(ChatSession::new().id, ChatSession::new().id);
    }
}
