//! Rule-based reply engine
//!
//! Pipeline: message → normalize → proactive suggestions → intent detection →
//! template dispatch → joined reply.
//!
//! The engine is stateless apart from its RNG. Carry-over between turns lives
//! in the caller-owned `ChatMemory`.

use crate::chat::context::{ChatContext, ChatMemory, ChatSession, Metric};
use crate::chat::intents::{classify_intents, normalize_message};
use crate::chat::templates::{template_for, MIND_SCORE_HIGH, MIND_SCORE_MID};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Reply for empty input
pub const DIDNT_CATCH_THAT: &str =
    "I didn't catch that. Try asking about your water, sleep, mood or mind score.";

pub const WATER_NUDGE: &str = "You haven't logged any water today. A glass now is an easy win.";
pub const SLEEP_NUDGE: &str = "Don't forget to log how you slept last night.";
pub const MOOD_NUDGE: &str = "How are you feeling? Take a second to log your mood.";

/// Separator between reply sections
const SECTION_SEPARATOR: &str = "\n\n";

/// Nudges for metrics that have no data yet, in priority order
const PROACTIVE_NUDGES: [(Metric, &str); 3] = [
    (Metric::Water, WATER_NUDGE),
    (Metric::Sleep, SLEEP_NUDGE),
    (Metric::Mood, MOOD_NUDGE),
];

/// Build this turn's proactive suggestions.
///
/// Nudges that were part of the previous suggestion set are skipped so the same
/// nudge is never shown twice in a row. The new set (possibly empty) replaces
/// `memory.last_suggestion`.
pub fn proactive_suggestions(ctx: &ChatContext, memory: &mut ChatMemory) -> String {
    let suggestions: Vec<&str> = PROACTIVE_NUDGES
        .iter()
        .filter(|(metric, _)| ctx.metric(*metric).is_none())
        .map(|(_, nudge)| *nudge)
        .filter(|nudge| !memory.recently_suggested(nudge))
        .collect();

    let joined = suggestions.join("\n");
    memory.last_suggestion = joined.clone();
    joined
}

/// Reply used when no intent matched and there is nothing to suggest
pub fn fallback_reply(ctx: &ChatContext) -> String {
    match ctx.valid_mind_score() {
        Some(score) if score >= MIND_SCORE_HIGH => format!(
            "I'm not sure I understood that, but you're having a good day with a mind score of {}. Ask me about water, sleep, mood, workouts or your cycle.",
            score
        ),
        Some(score) if score >= MIND_SCORE_MID => format!(
            "I'm not sure I understood that. Your mind score is {} today; ask me for a suggestion to boost it.",
            score
        ),
        Some(score) => format!(
            "I'm not sure I understood that. Your mind score is {} today, so how about a short breathing break? Type 'help' to see what I can do.",
            score
        ),
        None => "I'm not sure I understood that. Try asking about your water, sleep, mood or workouts, or type 'help' to see what I can do."
            .to_string(),
    }
}

/// Keyword-driven reply engine with an injectable random source
#[derive(Debug, Clone)]
pub struct ReplyEngine<R: Rng = StdRng> {
    rng: R,
}

impl Default for ReplyEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyEngine<StdRng> {
    /// Engine seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine with reproducible random choices
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> ReplyEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Answer `message` given today's context.
    ///
    /// Never fails: empty or unrecognized input degrades to fixed text.
    pub fn reply(&mut self, message: &str, ctx: &ChatContext, memory: &mut ChatMemory) -> String {
        let normalized = normalize_message(message);
        if normalized.is_empty() {
            return DIDNT_CATCH_THAT.to_string();
        }

        let proactive = proactive_suggestions(ctx, memory);
        let intents = classify_intents(&normalized);

        if intents.is_empty() {
            return if proactive.is_empty() {
                fallback_reply(ctx)
            } else {
                proactive
            };
        }

        let mut sections: Vec<String> = Vec::with_capacity(intents.len() + 1);
        if !proactive.is_empty() {
            sections.push(proactive);
        }
        for intent in intents {
            if let Some(template) = template_for(intent) {
                sections.push(template(ctx, &mut self.rng));
            }
        }
        sections.join(SECTION_SEPARATOR)
    }

    /// Reply within a session, advancing its turn counter
    pub fn reply_in_session(
        &mut self,
        message: &str,
        ctx: &ChatContext,
        session: &mut ChatSession,
    ) -> String {
        session.turns += 1;
        self.reply(message, ctx, &mut session.memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::quotes::QUOTES;
    use crate::chat::templates::{CAPABILITIES, MIND_SCORE_HIGH_MESSAGE, NO_MIND_SCORE_MESSAGE};
    use pretty_assertions::assert_eq;

    fn logged_context() -> ChatContext {
        ChatContext {
            water: Some("6 of 8 glasses".to_string()),
            sleep: Some("7h 45m".to_string()),
            mood: Some("calm".to_string()),
            ..ChatContext::new("Sam")
        }
    }

    #[test]
    fn test_empty_message() {
        let mut engine = ReplyEngine::with_seed(1);
        let mut memory = ChatMemory::new();
        for ctx in [ChatContext::default(), logged_context()] {
            assert_eq!(engine.reply("", &ctx, &mut memory), DIDNT_CATCH_THAT);
            assert_eq!(engine.reply("   \n", &ctx, &mut memory), DIDNT_CATCH_THAT);
        }
        // Empty input does not consume suggestions
        assert_eq!(memory.last_suggestion, "");
    }

    #[test]
    fn test_greeting_without_score_lists_capabilities() {
        let mut engine = ReplyEngine::with_seed(1);
        let mut memory = ChatMemory::new();
        let ctx = ChatContext::new("Sam");

        let reply = engine.reply("hi", &ctx, &mut memory);
        assert!(reply.contains("Sam"));
        assert!(reply.contains(CAPABILITIES));
        assert!(!reply.contains("/100"));
    }

    #[test]
    fn test_proactive_suggestions_suppress_repeats() {
        let ctx = logged_context();
        let ctx = ChatContext { water: None, ..ctx };
        let mut memory = ChatMemory::new();

        let first = proactive_suggestions(&ctx, &mut memory);
        assert_eq!(first, WATER_NUDGE);

        let second = proactive_suggestions(&ctx, &mut memory);
        assert_eq!(second, "");

        // Third call: the repeat guard only spans one turn
        let third = proactive_suggestions(&ctx, &mut memory);
        assert_eq!(third, WATER_NUDGE);
    }

    #[test]
    fn test_proactive_suggestions_multiple_missing() {
        let ctx = ChatContext::new("Sam");
        let mut memory = ChatMemory::new();

        let first = proactive_suggestions(&ctx, &mut memory);
        assert_eq!(first, format!("{}\n{}\n{}", WATER_NUDGE, SLEEP_NUDGE, MOOD_NUDGE));
        assert_eq!(memory.last_suggestion, first);

        let second = proactive_suggestions(&ctx, &mut memory);
        assert!(!second.contains(WATER_NUDGE));
        assert_eq!(second, "");
    }

    #[test]
    fn test_nothing_missing_means_no_suggestions() {
        let mut memory = ChatMemory::new();
        assert_eq!(proactive_suggestions(&logged_context(), &mut memory), "");
    }

    #[test]
    fn test_unmatched_message_returns_proactive_then_fallback() {
        let mut engine = ReplyEngine::with_seed(1);
        let mut memory = ChatMemory::new();
        let ctx = ChatContext {
            water: None,
            ..logged_context()
        };

        assert_eq!(engine.reply("banana", &ctx, &mut memory), WATER_NUDGE);
        assert_eq!(
            engine.reply("banana", &ctx, &mut memory),
            fallback_reply(&ctx)
        );
    }

    #[test]
    fn test_fallback_bands() {
        let with_score = |score| ChatContext {
            mind_score: score,
            ..logged_context()
        };
        assert!(fallback_reply(&with_score(85)).contains("good day with a mind score of 85"));
        assert!(fallback_reply(&with_score(55)).contains("suggestion to boost it"));
        assert!(fallback_reply(&with_score(12)).contains("breathing break"));
        assert!(fallback_reply(&with_score(0)).contains("type 'help'"));
        assert_eq!(fallback_reply(&with_score(0)), fallback_reply(&with_score(-3)));
    }

    #[test]
    fn test_zero_score_behaves_like_missing_score() {
        let mut engine = ReplyEngine::with_seed(1);
        let ctx = ChatContext {
            mind_score: 0,
            ..logged_context()
        };
        let reply = engine.reply("what's my score", &ctx, &mut ChatMemory::new());
        assert_eq!(reply, NO_MIND_SCORE_MESSAGE);

        let mut unmatched_memory = ChatMemory::new();
        assert_eq!(
            engine.reply("banana", &ctx, &mut unmatched_memory),
            fallback_reply(&logged_context())
        );
    }

    #[test]
    fn test_boundary_scores_are_valid() {
        let mut engine = ReplyEngine::with_seed(1);
        for score in [1, 100] {
            let ctx = ChatContext {
                mind_score: score,
                ..logged_context()
            };
            let reply = engine.reply("score", &ctx, &mut ChatMemory::new());
            assert!(reply.starts_with(&format!("Your mind score is {}/100.", score)));
        }
        let ctx = ChatContext {
            mind_score: 100,
            ..logged_context()
        };
        assert!(engine
            .reply("score", &ctx, &mut ChatMemory::new())
            .ends_with(MIND_SCORE_HIGH_MESSAGE));
    }

    #[test]
    fn test_multiple_intents_joined_with_blank_lines() {
        let mut engine = ReplyEngine::with_seed(1);
        let ctx = logged_context();
        let reply = engine.reply("Water and sleep?", &ctx, &mut ChatMemory::new());
        let sections: Vec<&str> = reply.split("\n\n").collect();
        assert_eq!(sections.len(), 2);
        assert!(sections[0].starts_with("Water today: 6 of 8 glasses."));
        assert!(sections[1].starts_with("Sleep last night: 7h 45m."));
    }

    #[test]
    fn test_proactive_text_is_prepended() {
        let mut engine = ReplyEngine::with_seed(1);
        let ctx = ChatContext {
            water: None,
            ..logged_context()
        };
        let reply = engine.reply("how did I sleep", &ctx, &mut ChatMemory::new());
        assert_eq!(
            reply,
            format!("{}\n\nSleep last night: 7h 45m. Aim for 7-9 hours to feel fully rested.", WATER_NUDGE)
        );
    }

    #[test]
    fn test_motivation_reply_is_a_known_quote() {
        let mut engine = ReplyEngine::new();
        let reply = engine.reply("motivate me", &logged_context(), &mut ChatMemory::new());
        assert!(QUOTES.contains(&reply.as_str()), "unexpected quote: {reply}");
    }

    #[test]
    fn test_seeded_engines_agree() {
        let ctx = logged_context();
        let mut a = ReplyEngine::with_seed(99);
        let mut b = ReplyEngine::with_seed(99);
        for _ in 0..5 {
            assert_eq!(
                a.reply("quote", &ctx, &mut ChatMemory::new()),
                b.reply("quote", &ctx, &mut ChatMemory::new())
            );
        }
    }

    #[test]
    fn test_reply_in_session_counts_turns() {
        let mut engine = ReplyEngine::with_seed(3);
        let mut session = ChatSession::new();
        let ctx = ChatContext::new("Sam");

        let first = engine.reply_in_session("water", &ctx, &mut session);
        let second = engine.reply_in_session("water", &ctx, &mut session);
        assert_eq!(session.turns, 2);
        assert!(first.starts_with(WATER_NUDGE));
        assert!(!second.contains(WATER_NUDGE));
    }
}
