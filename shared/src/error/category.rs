//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 4xxx: Cart errors
/// - 5xxx: Promo errors
/// - 6xxx: Catalog errors
/// - 8xxx: Backend errors
/// - everything else: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Cart errors (4xxx)
    Cart,
    /// Promo code errors (5xxx)
    Promo,
    /// Catalog errors (6xxx)
    Catalog,
    /// Backend errors (8xxx)
    Backend,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            4000..5000 => Self::Cart,
            5000..6000 => Self::Promo,
            6000..7000 => Self::Catalog,
            8000..9000 => Self::Backend,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Cart => "cart",
            Self::Promo => "promo",
            Self::Catalog => "catalog",
            Self::Backend => "backend",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
