//! FAQ fallback table

/// Minimum word length considered when comparing a message with an FAQ
pub const MIN_WORD_LEN: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQS: &[FaqEntry] = &[
    FaqEntry {
        question: "Do you have vegetarian options?",
        answer: "Yes. Use the dietary filters on the restaurant list to find vegetarian and vegan dishes.",
    },
    FaqEntry {
        question: "How do I report a food allergy?",
        answer: "Add your allergy to the special instructions of each item and contact the restaurant if you are unsure about ingredients.",
    },
    FaqEntry {
        question: "What areas do you deliver to?",
        answer: "We currently deliver across the city centre and surrounding districts. Enter your address to see the restaurants that deliver to you.",
    },
    FaqEntry {
        question: "Is there a minimum order amount?",
        answer: "Some restaurants set a minimum order amount. It is shown on the restaurant page and at checkout.",
    },
    FaqEntry {
        question: "How is the service fee calculated?",
        answer: "The service fee is 4.5% of your order subtotal and is shown before you pay.",
    },
    FaqEntry {
        question: "Can I schedule an order in advance?",
        answer: "Scheduled orders are not available yet. Orders are prepared as soon as the restaurant confirms them.",
    },
    FaqEntry {
        question: "How do I become a partner restaurant?",
        answer: "Restaurants can apply through the Partners page. Our team will get back to you within a few days.",
    },
];

/// Lower-cased words of at least [`MIN_WORD_LEN`] characters
pub fn significant_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| w.chars().count() >= MIN_WORD_LEN)
        .map(str::to_lowercase)
        .collect()
}

/// Number of distinct significant words of `message` that occur in `question`
pub fn overlap(message_words: &[String], question: &str) -> usize {
    let question_words = significant_words(question);
    let mut seen: Vec<&str> = Vec::new();
    for word in message_words {
        if question_words.iter().any(|q| q == word) && !seen.contains(&word.as_str()) {
            seen.push(word);
        }
    }
    seen.len()
}

/// FAQ entry with the largest word overlap; earlier entries win ties
pub fn best_match(message: &str) -> Option<(&'static FaqEntry, usize)> {
    let words = significant_words(message);
    if words.is_empty() {
        return None;
    }

    let mut best: Option<(&'static FaqEntry, usize)> = None;
    for entry in FAQS {
        let count = overlap(&words, entry.question);
        if count > 0 && best.is_none_or(|(_, c)| count > c) {
            best = Some((entry, count));
        }
    }
    best
}
