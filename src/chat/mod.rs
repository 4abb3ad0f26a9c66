//! Conversational reply engine
//!
//! Maps free-text input plus a snapshot of the user's daily metrics to canned,
//! context-aware wellness replies.
//!
//! Pipeline: message → intents (keyword table) → templates (dispatch table) → reply

pub mod context;
pub mod engine;
pub mod intents;
pub mod quotes;
pub mod templates;

pub use context::{ChatContext, ChatMemory, ChatSession, Metric};
pub use engine::{fallback_reply, proactive_suggestions, ReplyEngine, DIDNT_CATCH_THAT};
pub use intents::{classify_intents, Intent, INTENT_KEYWORDS};
pub use templates::{mind_score_reply, motivation_reply, template_for, Template, INTENT_TEMPLATES};
