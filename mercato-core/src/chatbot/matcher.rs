//! Message classification

use serde::Serialize;
use tracing::debug;

use super::faq;
use super::intents::{FALLBACK_RESPONSE, INTENTS, Intent};

/// Best intent score below this falls through to the FAQ table
pub const MIN_INTENT_SCORE: f64 = 0.1;

/// Answer to one user message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub intent: Intent,
    pub confidence: f64,
    pub response: String,
    /// Matched FAQ question when the answer came from the FAQ table
    pub faq_question: Option<String>,
}

/// Classify a message and pick a reply.
///
/// Stateless: each message is matched on its own.
pub fn reply(message: &str) -> ChatReply {
    let text = message.trim().to_lowercase();

    if let Some((def, score)) = best_intent(&text) {
        debug!(intent = %def.intent, score, "Chat intent matched");
        return ChatReply {
            intent: def.intent,
            confidence: score,
            response: def.response.to_string(),
            faq_question: None,
        };
    }

    if let Some((entry, count)) = faq::best_match(&text) {
        let question_words = faq::significant_words(entry.question).len().max(1);
        let confidence = (count as f64 / question_words as f64).min(1.0);
        debug!(question = entry.question, count, "Chat FAQ matched");
        return ChatReply {
            intent: Intent::Faq,
            confidence,
            response: entry.answer.to_string(),
            faq_question: Some(entry.question.to_string()),
        };
    }

    debug!("Chat message not understood");
    ChatReply {
        intent: Intent::Unknown,
        confidence: 0.0,
        response: FALLBACK_RESPONSE.to_string(),
        faq_question: None,
    }
}

/// Highest scoring intent at or above [`MIN_INTENT_SCORE`]
fn best_intent(text: &str) -> Option<(&'static super::intents::IntentDef, f64)> {
    let mut best: Option<(&'static super::intents::IntentDef, f64)> = None;
    for def in INTENTS {
        let score = def.score(text);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((def, score));
        }
    }
    best.filter(|(_, score)| *score >= MIN_INTENT_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_order_status() {
        let reply = reply("Where is my order?");
        assert_eq!(reply.intent, Intent::OrderStatus);
        assert!(approx(reply.confidence, 2.0 / 6.0 * 0.95));
        assert!(reply.faq_question.is_none());
    }

    #[test]
    fn test_refund_and_greeting() {
        let r = reply("I want a REFUND");
        assert_eq!(r.intent, Intent::Refund);
        assert!(approx(r.confidence, 0.18));

        let r = reply("hello there");
        assert_eq!(r.intent, Intent::Greeting);
        assert!(approx(r.confidence, 0.15));
    }

    #[test]
    fn test_higher_ratio_wins() {
        // promo: 2/5 * 0.85, payment: 2/6 * 0.85
        let r = reply("is there a discount coupon if I pay with cash?");
        assert_eq!(r.intent, Intent::PromoCodes);
    }

    #[test]
    fn test_ties_keep_table_order() {
        // greeting 1/6 * 0.9 < goodbye 1/4 * 0.9
        let r = reply("hey, bye");
        assert_eq!(r.intent, Intent::Goodbye);

        // Equal scores, earlier row wins
        let r = reply("cancel, bye");
        assert_eq!(r.intent, Intent::CancelOrder);
    }

    #[test]
    fn test_faq_fallback() {
        let r = reply("Which areas do you deliver to?");
        assert_eq!(r.intent, Intent::Faq);
        assert_eq!(r.faq_question.as_deref(), Some("What areas do you deliver to?"));
        assert!(approx(r.confidence, 2.0 / 3.0));
    }

    #[test]
    fn test_unknown_fallback() {
        let r = reply("qwerty asdf");
        assert_eq!(r.intent, Intent::Unknown);
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.response, FALLBACK_RESPONSE);

        assert_eq!(reply("").intent, Intent::Unknown);
    }
}
