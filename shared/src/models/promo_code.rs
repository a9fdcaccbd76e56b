//! Promo Code Model

use super::ServiceType;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a promo code's `discount_value` is interpreted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` is a percentage of the order total (10 = 10%)
    Percentage,
    /// `discount_value` is a currency amount
    Fixed,
}

/// Promo code row from the `promo_codes` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromoCode {
    pub id: String,
    /// Stored upper-case
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_value: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub min_order_amount: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub max_discount_amount: Option<Decimal>,
    /// Total redemptions allowed across all users
    pub usage_limit: Option<i32>,
    #[serde(default)]
    pub usage_count: i32,
    /// Redemptions allowed per user
    pub per_user_limit: Option<i32>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    /// Restaurant ids the code is restricted to (None or empty = all)
    #[serde(default)]
    pub applicable_restaurants: Option<Vec<String>>,
    /// Service types the code is restricted to (None or empty = all)
    #[serde(default)]
    pub applicable_services: Option<Vec<ServiceType>>,
    #[serde(default)]
    pub is_active: bool,
}

impl PromoCode {
    /// Normalize user input for comparison with stored codes
    pub fn normalize(code: &str) -> String {
        code.trim().to_uppercase()
    }
}

/// Redemption row from the `promo_code_usage` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromoRedemption {
    pub promo_code_id: String,
    pub user_id: String,
    pub order_id: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
}
