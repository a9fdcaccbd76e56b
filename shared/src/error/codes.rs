//! Unified error codes for Mercato
//!
//! Error codes are shared by the core, the backend client and any UI that
//! renders them. They are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Cart errors
//! - 5xxx: Promo code errors
//! - 6xxx: Catalog errors
//! - 8xxx: Backend errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for compact serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,

    // ==================== 4xxx: Cart ====================
    /// Cart has no items
    CartEmpty = 4001,
    /// Item is not in the cart
    CartItemNotFound = 4004,
    /// Price is invalid
    InvalidPrice = 4006,

    // ==================== 5xxx: Promo ====================
    /// Promo code unknown or inactive
    PromoNotFound = 5001,
    /// Promo code not active yet
    PromoNotYetActive = 5002,
    /// Promo code expired
    PromoExpired = 5003,
    /// Order below promo minimum
    PromoMinimumNotMet = 5004,
    /// Promo global usage limit reached
    PromoUsageLimitReached = 5005,
    /// Promo per-user limit reached
    PromoAlreadyUsed = 5006,
    /// Restaurant not eligible for promo
    PromoRestaurantNotEligible = 5007,
    /// Service type not eligible for promo
    PromoServiceNotEligible = 5008,

    // ==================== 6xxx: Catalog ====================
    /// Restaurant not found
    RestaurantNotFound = 6001,
    /// Menu item not found
    MenuItemNotFound = 6002,
    /// Menu item currently unavailable
    MenuItemUnavailable = 6003,

    // ==================== 8xxx: Backend ====================
    /// Backend could not be reached
    BackendUnavailable = 8001,
    /// Backend rejected the request
    BackendRejected = 8002,
    /// Backend relation or function is not provisioned
    RelationNotProvisioned = 8003,
    /// Not authenticated against the backend
    NotAuthenticated = 8004,
    /// Backend denied access
    PermissionDenied = 8005,
    /// Backend response did not match the expected shape
    InvalidResponse = 8006,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Local storage error
    StorageError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",

            // Cart
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::CartItemNotFound => "Item is not in the cart",
            ErrorCode::InvalidPrice => "Invalid price",

            // Promo
            ErrorCode::PromoNotFound => "Invalid promo code",
            ErrorCode::PromoNotYetActive => "This promo code is not yet active",
            ErrorCode::PromoExpired => "This promo code has expired",
            ErrorCode::PromoMinimumNotMet => "Order does not meet the promo minimum",
            ErrorCode::PromoUsageLimitReached => "This promo code has reached its usage limit",
            ErrorCode::PromoAlreadyUsed => "You have already used this promo code",
            ErrorCode::PromoRestaurantNotEligible => {
                "This promo code is not valid for this restaurant"
            }
            ErrorCode::PromoServiceNotEligible => "This promo code is not valid for this service",

            // Catalog
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemUnavailable => "Menu item is currently unavailable",

            // Backend
            ErrorCode::BackendUnavailable => "Backend is unavailable",
            ErrorCode::BackendRejected => "Backend rejected the request",
            ErrorCode::RelationNotProvisioned => "Feature is not provisioned on the backend",
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::InvalidResponse => "Unexpected response from backend",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageError => "Local storage error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),

            // Cart
            4001 => Ok(ErrorCode::CartEmpty),
            4004 => Ok(ErrorCode::CartItemNotFound),
            4006 => Ok(ErrorCode::InvalidPrice),

            // Promo
            5001 => Ok(ErrorCode::PromoNotFound),
            5002 => Ok(ErrorCode::PromoNotYetActive),
            5003 => Ok(ErrorCode::PromoExpired),
            5004 => Ok(ErrorCode::PromoMinimumNotMet),
            5005 => Ok(ErrorCode::PromoUsageLimitReached),
            5006 => Ok(ErrorCode::PromoAlreadyUsed),
            5007 => Ok(ErrorCode::PromoRestaurantNotEligible),
            5008 => Ok(ErrorCode::PromoServiceNotEligible),

            // Catalog
            6001 => Ok(ErrorCode::RestaurantNotFound),
            6002 => Ok(ErrorCode::MenuItemNotFound),
            6003 => Ok(ErrorCode::MenuItemUnavailable),

            // Backend
            8001 => Ok(ErrorCode::BackendUnavailable),
            8002 => Ok(ErrorCode::BackendRejected),
            8003 => Ok(ErrorCode::RelationNotProvisioned),
            8004 => Ok(ErrorCode::NotAuthenticated),
            8005 => Ok(ErrorCode::PermissionDenied),
            8006 => Ok(ErrorCode::InvalidResponse),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::CartEmpty.code(), 4001);
        assert_eq!(ErrorCode::PromoExpired.code(), 5003);
        assert_eq!(ErrorCode::RestaurantNotFound.code(), 6001);
        assert_eq!(ErrorCode::RelationNotProvisioned.code(), 8003);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(4004), Ok(ErrorCode::CartItemNotFound));
        assert_eq!(ErrorCode::try_from(6003), Ok(ErrorCode::MenuItemUnavailable));
        assert_eq!(ErrorCode::try_from(5006), Ok(ErrorCode::PromoAlreadyUsed));
        assert_eq!(ErrorCode::try_from(9003), Ok(ErrorCode::ConfigError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert!(ErrorCode::try_from(4999).is_err());
        assert!(ErrorCode::try_from(4003).is_err());
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::PromoMinimumNotMet).unwrap();
        assert_eq!(json, "5004");

        let parsed: ErrorCode = serde_json::from_str("8003").unwrap();
        assert_eq!(parsed, ErrorCode::RelationNotProvisioned);

        let invalid: Result<ErrorCode, _> = serde_json::from_str("1234");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::CartEmpty), "4001");
        assert_eq!(ErrorCode::PromoNotFound.message(), "Invalid promo code");
        assert_eq!(
            format!("{}", InvalidErrorCode(42)),
            "invalid error code: 42"
        );
    }
}
