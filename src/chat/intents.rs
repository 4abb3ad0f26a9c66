//! Intent detection
//!
//! A message is matched against a fixed keyword table. An intent is detected
//! when any of its keywords appears as a substring of the lower-cased message,
//! so several intents can match one message. Matching is plain substring
//! search: short keywords like "hi" also match inside longer words.

use serde::{Deserialize, Serialize};

/// Coarse conversational goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    MindScore,
    Water,
    Sleep,
    Workout,
    Mood,
    Period,
    Calories,
    Meditation,
    Tasks,
    Stress,
    Motivation,
    Summary,
    Help,
    Suggestion,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::MindScore => "mind_score",
            Intent::Water => "water",
            Intent::Sleep => "sleep",
            Intent::Workout => "workout",
            Intent::Mood => "mood",
            Intent::Period => "period",
            Intent::Calories => "calories",
            Intent::Meditation => "meditation",
            Intent::Tasks => "tasks",
            Intent::Stress => "stress",
            Intent::Motivation => "motivation",
            Intent::Summary => "summary",
            Intent::Help => "help",
            Intent::Suggestion => "suggestion",
        }
    }
}

/// Intent → keywords, in matching order
pub const INTENT_KEYWORDS: [(Intent, &[&str]); 15] = [
    (
        Intent::Greeting,
        &["hi", "hello", "hey", "good morning", "good evening"],
    ),
    (
        Intent::MindScore,
        &["mind score", "score", "how am i doing", "wellness"],
    ),
    (Intent::Water, &["water", "hydrat", "drink"]),
    (Intent::Sleep, &["sleep", "slept", "tired", "insomnia", "nap"]),
    (
        Intent::Workout,
        &["workout", "exercise", "gym", "training", "steps"],
    ),
    (Intent::Mood, &["mood", "feel", "sad", "happy", "anxious"]),
    (
        Intent::Period,
        &["period", "cycle", "menstrua", "ovulat", "fertile"],
    ),
    (
        Intent::Calories,
        &["calorie", "food", "diet", "meal", "nutrition"],
    ),
    (Intent::Meditation, &["meditat", "mindful", "breath", "calm"]),
    (Intent::Tasks, &["task", "todo", "to-do", "productiv"]),
    (Intent::Stress, &["stress", "overwhelm", "anxiety", "panic"]),
    (
        Intent::Motivation,
        &["motivat", "inspire", "quote", "encourage"],
    ),
    (Intent::Summary, &["summary", "overview", "my day", "report"]),
    (Intent::Help, &["help", "what can you do", "commands"]),
    (
        Intent::Suggestion,
        &["suggest", "recommend", "advice", "tip", "what should i do"],
    ),
];

/// Normalize a message for matching: trimmed and lower-cased
pub fn normalize_message(message: &str) -> String {
    message.trim().to_lowercase()
}

/// Detect every intent whose keywords occur in `message`.
///
/// The result follows table order and holds each intent at most once.
pub fn classify_intents(message: &str) -> Vec<Intent> {
    let normalized = normalize_message(message);
    if normalized.is_empty() {
        return Vec::new();
    }

    INTENT_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(intent, _)| *intent)
        .collect()
}
