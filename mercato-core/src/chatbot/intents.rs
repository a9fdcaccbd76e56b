//! Intent table
//!
//! Keywords are matched by substring against the lower-cased message, so
//! they avoid short fragments that occur inside common words.

use serde::{Deserialize, Serialize};

/// What the user is asking about
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    OrderStatus,
    CancelOrder,
    Refund,
    DeliveryTime,
    PaymentMethods,
    PromoCodes,
    HotelBooking,
    RideBooking,
    VenueBooking,
    AccountHelp,
    ContactSupport,
    Thanks,
    Goodbye,
    /// Answered from the FAQ table
    Faq,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::OrderStatus => "order_status",
            Intent::CancelOrder => "cancel_order",
            Intent::Refund => "refund",
            Intent::DeliveryTime => "delivery_time",
            Intent::PaymentMethods => "payment_methods",
            Intent::PromoCodes => "promo_codes",
            Intent::HotelBooking => "hotel_booking",
            Intent::RideBooking => "ride_booking",
            Intent::VenueBooking => "venue_booking",
            Intent::AccountHelp => "account_help",
            Intent::ContactSupport => "contact_support",
            Intent::Thanks => "thanks",
            Intent::Goodbye => "goodbye",
            Intent::Faq => "faq",
            Intent::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the intent table
#[derive(Debug, Clone, Copy)]
pub struct IntentDef {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
    /// Weight applied to the keyword hit ratio (0..=1)
    pub confidence: f64,
    pub response: &'static str,
}

impl IntentDef {
    /// Fraction of keywords found in `text`, scaled by the confidence weight
    ///
    /// `text` must already be lower-cased.
    pub fn score(&self, text: &str) -> f64 {
        if self.keywords.is_empty() {
            return 0.0;
        }
        let matched = self.keywords.iter().filter(|k| text.contains(*k)).count();
        matched as f64 / self.keywords.len() as f64 * self.confidence
    }
}

/// Table order breaks ties
pub const INTENTS: &[IntentDef] = &[
    IntentDef {
        intent: Intent::Greeting,
        keywords: &["hello", "hey", "good morning", "good afternoon", "good evening", "greetings"],
        confidence: 0.9,
        response: "Hello! How can I help you today? I can check on orders, bookings, payments and promo codes.",
    },
    IntentDef {
        intent: Intent::OrderStatus,
        keywords: &["where is my order", "order status", "track", "my order", "delivery status", "not arrived"],
        confidence: 0.95,
        response: "You can follow your order live from the Orders page. Open the order to see its current status and the courier's position.",
    },
    IntentDef {
        intent: Intent::CancelOrder,
        keywords: &["cancel", "cancellation", "stop my order", "change my mind"],
        confidence: 0.9,
        response: "Orders can be cancelled from the Orders page until the restaurant starts preparing them. After that, please contact support.",
    },
    IntentDef {
        intent: Intent::Refund,
        keywords: &["refund", "money back", "reimburse", "charged twice", "wrong item"],
        confidence: 0.9,
        response: "Sorry about that. Refund requests can be raised from the order details page and are usually processed within 5-7 business days.",
    },
    IntentDef {
        intent: Intent::DeliveryTime,
        keywords: &["how long", "delivery time", "when will", "arrive", "estimated", "minutes"],
        confidence: 0.85,
        response: "Most deliveries arrive within 30-45 minutes. The estimate for each restaurant is shown on its page.",
    },
    IntentDef {
        intent: Intent::PaymentMethods,
        keywords: &["payment", "pay with", "credit card", "cash", "wallet", "apple pay"],
        confidence: 0.85,
        response: "We accept credit and debit cards, digital wallets and cash on delivery where available.",
    },
    IntentDef {
        intent: Intent::PromoCodes,
        keywords: &["promo", "discount", "coupon", "voucher", "offer"],
        confidence: 0.85,
        response: "Enter your promo code at checkout. Check the Offers page for codes currently available to you.",
    },
    IntentDef {
        intent: Intent::HotelBooking,
        keywords: &["hotel", "room", "check-in", "check in", "checkout time", "night stay"],
        confidence: 0.85,
        response: "You can browse and book hotels from the Hotels tab. Your reservations appear under My Bookings.",
    },
    IntentDef {
        intent: Intent::RideBooking,
        keywords: &["ride", "taxi", "driver", "pickup", "drop off", "airport"],
        confidence: 0.85,
        response: "Book a ride from the Rides tab: set your pickup and destination to see available drivers and fares.",
    },
    IntentDef {
        intent: Intent::VenueBooking,
        keywords: &["venue", "event", "experience", "tickets", "reserve a table", "party"],
        confidence: 0.85,
        response: "Venues and experiences can be booked from the Venues tab. Pick a date and party size to see availability.",
    },
    IntentDef {
        intent: Intent::AccountHelp,
        keywords: &["account", "password", "login", "log in", "sign in", "profile", "email"],
        confidence: 0.8,
        response: "You can manage your account from the Profile page. Use \"Forgot password\" on the sign-in screen to reset your password.",
    },
    IntentDef {
        intent: Intent::ContactSupport,
        keywords: &["human", "agent", "support", "contact", "speak to", "complaint"],
        confidence: 0.85,
        response: "You can reach our support team at support@mercato.app or through the Help page, 24/7.",
    },
    IntentDef {
        intent: Intent::Thanks,
        keywords: &["thank", "thanks", "appreciate", "helpful"],
        confidence: 0.9,
        response: "You're welcome! Is there anything else I can help with?",
    },
    IntentDef {
        intent: Intent::Goodbye,
        keywords: &["bye", "goodbye", "see you", "that's all"],
        confidence: 0.9,
        response: "Goodbye! Enjoy your order.",
    },
];

/// Reply when neither an intent nor an FAQ matches
pub const FALLBACK_RESPONSE: &str = "I'm not sure I understood. You can ask about orders, deliveries, payments, promo codes or bookings, or type \"support\" to reach our team.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_answerable_intent() {
        assert_eq!(INTENTS.len(), 14);
        for def in INTENTS {
            assert!(!def.keywords.is_empty(), "{} has no keywords", def.intent);
            assert!(def.confidence > 0.0 && def.confidence <= 1.0);
            assert!(def.keywords.iter().all(|k| k.to_lowercase() == *k));
        }
    }

    #[test]
    fn test_score_is_ratio_times_confidence() {
        let refund = INTENTS.iter().find(|d| d.intent == Intent::Refund).unwrap();
        assert!((refund.score("i want a refund") - 0.18).abs() < 1e-9);
        assert!((refund.score("refund my money back") - 0.36).abs() < 1e-9);
        assert_eq!(refund.score("nothing relevant"), 0.0);
    }
}
