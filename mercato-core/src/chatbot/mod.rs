//! Support chatbot
//!
//! Keyword scoring over a fixed intent table, with a word-overlap search of
//! the FAQ table when no intent scores high enough.

mod faq;
mod intents;
mod matcher;

pub use faq::{FAQS, FaqEntry};
pub use intents::{FALLBACK_RESPONSE, INTENTS, Intent, IntentDef};
pub use matcher::{ChatReply, MIN_INTENT_SCORE, reply};
