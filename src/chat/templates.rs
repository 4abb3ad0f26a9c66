//! Per-intent reply templates
//!
//! Each intent maps to one formatting function over the `ChatContext`. The
//! functions share one signature so they can live in a single dispatch table;
//! only the motivation and suggestion templates draw from the RNG.

use crate::chat::context::{ChatContext, Metric};
use crate::chat::intents::Intent;
use crate::chat::quotes::{QUOTES, WELLNESS_FACTS};
use rand::seq::SliceRandom;
use rand::RngCore;

/// Reply template signature
pub type Template = fn(&ChatContext, &mut dyn RngCore) -> String;

/// Scores at or above this are "doing great"
pub const MIND_SCORE_HIGH: i32 = 70;

/// Scores at or above this (and below `MIND_SCORE_HIGH`) get a gentle nudge
pub const MIND_SCORE_MID: i32 = 50;

pub const MIND_SCORE_HIGH_MESSAGE: &str =
    "You're doing great today, keep up the good habits!";
pub const MIND_SCORE_MID_MESSAGE: &str =
    "Not bad! A glass of water or a short walk could lift it further.";
pub const MIND_SCORE_LOW_MESSAGE: &str =
    "Let's turn it around: try a 5-minute breathing exercise and drink a glass of water.";
pub const NO_MIND_SCORE_MESSAGE: &str =
    "I don't have a mind score for you yet. Log your water, sleep and mood to generate one.";

/// What the assistant can talk about, used by greetings and help
pub const CAPABILITIES: &str = "I can help you with your water intake, sleep, workouts, mood, cycle tracking, calories, meditation and tasks. Just ask!";

/// Intent → template, in the same order as the keyword table
pub const INTENT_TEMPLATES: [(Intent, Template); 15] = [
    (Intent::Greeting, greeting_reply),
    (Intent::MindScore, mind_score_reply),
    (Intent::Water, water_reply),
    (Intent::Sleep, sleep_reply),
    (Intent::Workout, workout_reply),
    (Intent::Mood, mood_reply),
    (Intent::Period, period_reply),
    (Intent::Calories, calories_reply),
    (Intent::Meditation, meditation_reply),
    (Intent::Tasks, tasks_reply),
    (Intent::Stress, stress_reply),
    (Intent::Motivation, motivation_template),
    (Intent::Summary, summary_reply),
    (Intent::Help, help_reply),
    (Intent::Suggestion, suggestion_reply),
];

/// Look up the template for an intent
pub fn template_for(intent: Intent) -> Option<Template> {
    INTENT_TEMPLATES
        .iter()
        .find(|(i, _)| *i == intent)
        .map(|(_, template)| *template)
}

/// Band message for a valid score
pub fn mind_score_band_message(score: i32) -> &'static str {
    if score >= MIND_SCORE_HIGH {
        MIND_SCORE_HIGH_MESSAGE
    } else if score >= MIND_SCORE_MID {
        MIND_SCORE_MID_MESSAGE
    } else {
        MIND_SCORE_LOW_MESSAGE
    }
}

pub fn greeting_reply(ctx: &ChatContext, _rng: &mut dyn RngCore) -> String {
    match ctx.valid_mind_score() {
        Some(score) => format!(
            "Hi {}! Your mind score today is {}/100. {}",
            ctx.display_name(),
            score,
            mind_score_band_message(score)
        ),
        None => format!(
            "Hi {}! I'm your wellness companion. {}",
            ctx.display_name(),
            CAPABILITIES
        ),
    }
}

pub fn mind_score_reply(ctx: &ChatContext, _rng: &mut dyn RngCore) -> String {
    match ctx.valid_mind_score() {
        Some(score) => format!(
            "Your mind score is {}/100. {}",
            score,
            mind_score_band_message(score)
        ),
        None => NO_MIND_SCORE_MESSAGE.to_string(),
    }
}

pub fn water_reply(ctx: &ChatContext, _rng: &mut dyn RngCore) -> String {
    match ctx.metric(Metric::Water) {
        Some(water) => format!(
            "Water today: {}. Staying hydrated keeps your energy and focus up.",
            water
        ),
        None => "You haven't logged any water yet today. Aim for about 8 glasses, starting with one now."
            .to_string(),
    }
}

pub fn sleep_reply(ctx: &ChatContext, _rng: &mut dyn RngCore) -> String {
    match ctx.metric(Metric::Sleep) {
        Some(sleep) => format!(
            "Sleep last night: {}. Aim for 7-9 hours to feel fully rested.",
            sleep
        ),
        None => "No sleep logged yet. Tracking your sleep helps spot what affects your energy."
            .to_string(),
    }
}

pub fn workout_reply(ctx: &ChatContext, _rng: &mut dyn RngCore) -> String {
    match ctx.metric(Metric::Workout) {
        Some(workout) => format!("Workout today: {}. Great job staying active!", workout),
        None => "No workout logged today. Even a 15-minute walk counts!".to_string(),
    }
}

pub fn mood_reply(ctx: &ChatContext, _rng: &mut dyn RngCore) -> String {
    match ctx.metric(Metric::Mood) {
        Some(mood) => format!(
            "You logged your mood as: {}. Thanks for checking in with yourself.",
            mood
        ),
        None => "How are you feeling today? Logging your mood helps you notice patterns over time."
            .to_string(),
    }
}

pub fn period_reply(ctx: &ChatContext, _rng: &mut dyn RngCore) -> String {
    match ctx.metric(Metric::Period) {
        Some(period) => format!("Cycle update: {}.", period),
        None => "You haven't started tracking your cycle yet. Log your last period to get predictions."
            .to_string(),
    }
}

pub fn calories_reply(ctx: &ChatContext, _rng: &mut dyn RngCore) -> String {
    match ctx.metric(Metric::Calories) {
        Some(calories) => format!(
            "Calories today: {}. Balanced meals with protein and fiber keep you full longer.",
            calories
        ),
        None => "No meals logged yet today. Logging food helps you understand your energy levels."
            .to_string(),
    }
}

pub fn meditation_reply(ctx: &ChatContext, _rng: &mut dyn RngCore) -> String {
    match ctx.metric(Metric::Meditation) {
        Some(meditation) => format!(
            "Meditation today: {}. Every mindful minute counts.",
            meditation
        ),
        None => "You haven't meditated yet today. Try a 5-minute breathing session to reset."
            .to_string(),
    }
}

pub fn tasks_reply(ctx: &ChatContext, _rng: &mut dyn RngCore) -> String {
    match ctx.metric(Metric::Tasks) {
        Some(tasks) => format!(
            "Tasks: {}. Tackle the most important one first, then take a short break.",
            tasks
        ),
        None => "Your task list is empty. Add one small goal for today to build momentum."
            .to_string(),
    }
}

pub fn stress_reply(ctx: &ChatContext, _rng: &mut dyn RngCore) -> String {
    let mut reply = String::from(
        "I'm sorry you're feeling stressed. Try the 4-7-8 technique: breathe in for 4 seconds, hold for 7, and exhale for 8.",
    );
    if ctx.metric(Metric::Meditation).is_none() {
        reply.push_str(" A short meditation could also help.");
    }
    if let Some(score) = ctx.valid_mind_score() {
        if score < MIND_SCORE_MID {
            reply.push_str(" Your mind score is on the low side today, so be gentle with yourself.");
        }
    }
    reply
}

/// Pick a quote uniformly at random from `QUOTES`
pub fn motivation_reply(rng: &mut dyn RngCore) -> String {
    QUOTES
        .choose(rng)
        .map(|quote| quote.to_string())
        .unwrap_or_default()
}

fn motivation_template(_ctx: &ChatContext, rng: &mut dyn RngCore) -> String {
    motivation_reply(rng)
}

pub fn summary_reply(ctx: &ChatContext, _rng: &mut dyn RngCore) -> String {
    let mut lines = vec![format!("Here's your day so far, {}:", ctx.display_name())];
    lines.push(match ctx.valid_mind_score() {
        Some(score) => format!("- Mind score: {}/100", score),
        None => "- Mind score: not available".to_string(),
    });
    for metric in Metric::ALL {
        lines.push(format!(
            "- {}: {}",
            metric.label(),
            ctx.metric(metric).unwrap_or("not logged")
        ));
    }
    lines.join("\n")
}

pub fn help_reply(_ctx: &ChatContext, _rng: &mut dyn RngCore) -> String {
    [
        "Here's what I can help with:",
        "- Your mind score and how to improve it",
        "- Water, sleep, workouts and calories",
        "- Mood check-ins and stress relief",
        "- Cycle tracking and predictions",
        "- Meditation and tasks",
        "- A daily summary, suggestions or a motivational quote",
    ]
    .join("\n")
}

pub fn suggestion_reply(ctx: &ChatContext, rng: &mut dyn RngCore) -> String {
    const PRIORITY: [Metric; 5] = [
        Metric::Water,
        Metric::Sleep,
        Metric::Mood,
        Metric::Workout,
        Metric::Meditation,
    ];

    let missing = PRIORITY.into_iter().find(|m| ctx.metric(*m).is_none());
    match missing {
        Some(Metric::Water) => "Start with a glass of water, then log it.".to_string(),
        Some(Metric::Sleep) => {
            "Log how you slept last night so we can track your rest.".to_string()
        }
        Some(Metric::Mood) => "Take a moment to check in and log your mood.".to_string(),
        Some(Metric::Workout) => {
            "Try a 15-minute walk or some light stretching today.".to_string()
        }
        Some(_) => "Give a 5-minute guided meditation a try.".to_string(),
        None => {
            let fact = WELLNESS_FACTS.choose(rng).copied().unwrap_or_default();
            format!("Everything is logged today, nice work! Did you know? {}", fact)
        }
    }
}
