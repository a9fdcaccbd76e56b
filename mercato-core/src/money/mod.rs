//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are carried as `Decimal` end to end. Rounding to cents only
//! happens for display and for payloads sent to the backend.

use rust_decimal::prelude::*;
use shared::error::{AppError, ErrorCode};

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Service fee charged on the cart subtotal (4.5%)
pub const SERVICE_FEE_RATE: Decimal = Decimal::from_parts(45, 0, 0, false, 3);

/// No tax is levied on the client; downstream systems may add it
pub const TAX_RATE: Decimal = Decimal::ZERO;

/// Maximum allowed unit price (1,000,000)
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Round to cents, half away from zero
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert f64 to Decimal (non-finite values become zero)
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal to f64, rounded to cents
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Service fee for a subtotal, unrounded
pub fn service_fee(subtotal: Decimal) -> Decimal {
    subtotal * SERVICE_FEE_RATE
}

/// Tax for a subtotal, unrounded
pub fn tax(subtotal: Decimal) -> Decimal {
    subtotal * TAX_RATE
}

/// `percent`% of `amount` (10 = 10%)
pub fn percentage_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount * percent / Decimal::ONE_HUNDRED
}

/// Format an amount with two decimals ("12.50")
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", round_money(value))
}

/// Parse a user or config supplied amount ("2.99")
pub fn parse_money(value: &str) -> Result<Decimal, AppError> {
    value.trim().parse::<Decimal>().map_err(|e| {
        AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("invalid amount '{}': {}", value, e),
        )
    })
}

/// Validate a unit price: non-negative and at most [`MAX_PRICE`]
pub fn validate_price(price: Decimal, field: &str) -> Result<(), AppError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("{} must be non-negative, got {}", field, price),
        ));
    }
    if price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!(
                "{} exceeds maximum allowed ({}), got {}",
                field, MAX_PRICE, price
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
