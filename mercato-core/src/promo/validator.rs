//! Promo Code Validator
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. unknown or inactive code
//! 2. not yet active (`valid_from` in the future)
//! 3. expired (`valid_until` in the past)
//! 4. order total below `min_order_amount`
//! 5. global `usage_limit` reached
//! 6. `per_user_limit` reached for this user
//! 7. restaurant not in `applicable_restaurants`
//! 8. service type not in `applicable_services`
//!
//! A code that passes every check yields a discount: percentage of the order
//! total or a fixed amount, clamped to `max_discount_amount`, then to the
//! order total, then rounded to cents.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{DiscountType, PromoCode, ServiceType};
use thiserror::Error;
use tracing::debug;

use crate::money::{format_money, percentage_of, round_money};

/// Order facts a promo code is checked against
#[derive(Debug, Clone)]
pub struct PromoContext<'a> {
    pub order_total: Decimal,
    pub restaurant_id: Option<&'a str>,
    pub service_type: ServiceType,
    /// How many times this user already redeemed the code
    pub user_redemptions: i32,
    pub now: DateTime<Utc>,
}

/// Why a promo code was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum PromoRejection {
    #[error("Invalid promo code")]
    NotFound,

    #[error("This promo code is not active yet")]
    NotYetActive,

    #[error("This promo code has expired")]
    Expired,

    #[error("Minimum order amount of {minimum:.2} required")]
    BelowMinimum {
        #[serde(with = "rust_decimal::serde::float")]
        minimum: Decimal,
    },

    #[error("This promo code has reached its usage limit")]
    UsageLimitReached,

    #[error("You have already used this promo code")]
    AlreadyUsed,

    #[error("This promo code is not valid for this restaurant")]
    RestaurantNotEligible,

    #[error("This promo code is not valid for this service")]
    ServiceNotEligible,
}

impl PromoRejection {
    pub fn code(&self) -> ErrorCode {
        match self {
            PromoRejection::NotFound => ErrorCode::PromoNotFound,
            PromoRejection::NotYetActive => ErrorCode::PromoNotYetActive,
            PromoRejection::Expired => ErrorCode::PromoExpired,
            PromoRejection::BelowMinimum { .. } => ErrorCode::PromoMinimumNotMet,
            PromoRejection::UsageLimitReached => ErrorCode::PromoUsageLimitReached,
            PromoRejection::AlreadyUsed => ErrorCode::PromoAlreadyUsed,
            PromoRejection::RestaurantNotEligible => ErrorCode::PromoRestaurantNotEligible,
            PromoRejection::ServiceNotEligible => ErrorCode::PromoServiceNotEligible,
        }
    }
}

impl From<PromoRejection> for AppError {
    fn from(rejection: PromoRejection) -> Self {
        let err = AppError::with_message(rejection.code(), rejection.to_string());
        match rejection {
            PromoRejection::BelowMinimum { minimum } => {
                err.with_detail("minimum", crate::money::to_f64(minimum))
            }
            _ => err,
        }
    }
}

/// Result of validating a promo code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromoVerdict {
    pub valid: bool,
    /// Normalized code (upper-case), empty when rejected
    pub code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    pub message: String,
    pub rejection: Option<PromoRejection>,
}

impl PromoVerdict {
    fn accepted(code: &str, discount_amount: Decimal) -> Self {
        Self {
            valid: true,
            code: code.to_string(),
            message: format!("Promo applied: -{}", format_money(discount_amount)),
            discount_amount,
            rejection: None,
        }
    }

    fn rejected(rejection: PromoRejection) -> Self {
        Self {
            valid: false,
            code: String::new(),
            discount_amount: Decimal::ZERO,
            message: rejection.to_string(),
            rejection: Some(rejection),
        }
    }

    /// Convert into a `Result`, for callers that treat rejection as an error
    pub fn into_result(self) -> Result<Decimal, PromoRejection> {
        match self.rejection {
            Some(rejection) => Err(rejection),
            None => Ok(self.discount_amount),
        }
    }
}

/// Validate a promo code (already looked up) against an order.
///
/// `promo` is `None` when the lookup found nothing.
pub fn validate_promo(promo: Option<&PromoCode>, ctx: &PromoContext<'_>) -> PromoVerdict {
    let Some(promo) = promo.filter(|p| p.is_active) else {
        return PromoVerdict::rejected(PromoRejection::NotFound);
    };

    if let Err(rejection) = check_eligibility(promo, ctx) {
        debug!(code = %promo.code, ?rejection, "Promo code rejected");
        return PromoVerdict::rejected(rejection);
    }

    let discount = calculate_discount(promo, ctx.order_total);
    debug!(code = %promo.code, %discount, "Promo code accepted");
    PromoVerdict::accepted(&PromoCode::normalize(&promo.code), discount)
}

/// Checks 2 to 8 of the waterfall
fn check_eligibility(promo: &PromoCode, ctx: &PromoContext<'_>) -> Result<(), PromoRejection> {
    if promo.valid_from.is_some_and(|from| ctx.now < from) {
        return Err(PromoRejection::NotYetActive);
    }

    if promo.valid_until.is_some_and(|until| ctx.now > until) {
        return Err(PromoRejection::Expired);
    }

    if let Some(minimum) = promo.min_order_amount
        && ctx.order_total < minimum
    {
        return Err(PromoRejection::BelowMinimum { minimum });
    }

    if promo
        .usage_limit
        .is_some_and(|limit| promo.usage_count >= limit)
    {
        return Err(PromoRejection::UsageLimitReached);
    }

    if promo
        .per_user_limit
        .is_some_and(|limit| ctx.user_redemptions >= limit)
    {
        return Err(PromoRejection::AlreadyUsed);
    }

    if let Some(restaurants) = promo.applicable_restaurants.as_deref().filter(|r| !r.is_empty()) {
        let eligible = ctx
            .restaurant_id
            .is_some_and(|id| restaurants.iter().any(|r| r == id));
        if !eligible {
            return Err(PromoRejection::RestaurantNotEligible);
        }
    }

    if let Some(services) = promo.applicable_services.as_deref().filter(|s| !s.is_empty())
        && !services.contains(&ctx.service_type)
    {
        return Err(PromoRejection::ServiceNotEligible);
    }

    Ok(())
}

/// Discount a valid code grants on `order_total`, rounded to cents
pub fn calculate_discount(promo: &PromoCode, order_total: Decimal) -> Decimal {
    let order_total = order_total.max(Decimal::ZERO);

    let mut discount = match promo.discount_type {
        DiscountType::Percentage => percentage_of(order_total, promo.discount_value),
        DiscountType::Fixed => promo.discount_value,
    };

    if let Some(cap) = promo.max_discount_amount {
        discount = discount.min(cap);
    }

    round_money(discount.min(order_total).max(Decimal::ZERO))
}
