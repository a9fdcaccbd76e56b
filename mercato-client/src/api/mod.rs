//! Typed per-table APIs
//!
//! Each submodule adds methods to [`BackendClient`](crate::BackendClient).
//! Rows are checked at the boundary: a row that fails a guard turns the
//! whole call into [`ClientError::InvalidResponse`]. List calls degrade to
//! empty when their table is not provisioned; single-row and write calls
//! surface every error.

mod experiments;
mod favorites;
mod menu;
mod orders;
mod promos;
mod restaurants;

use crate::{ClientError, ClientResult};
use rust_decimal::Decimal;

pub(crate) const RESTAURANTS: &str = "restaurants";
pub(crate) const MENU_ITEMS: &str = "menu_items";
pub(crate) const PROMO_CODES: &str = "promo_codes";
pub(crate) const PROMO_CODE_USAGE: &str = "promo_code_usage";
pub(crate) const ORDERS: &str = "orders";
pub(crate) const FAVORITES: &str = "favorites";
pub(crate) const EXPERIMENTS: &str = "experiments";
pub(crate) const EXPERIMENT_ASSIGNMENTS: &str = "experiment_assignments";

pub(crate) const INCREMENT_PROMO_USAGE: &str = "increment_promo_usage";

/// Reject blank identifiers before they reach the backend
pub(crate) fn require_id(field: &str, value: &str) -> ClientResult<()> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Guard on a received row
pub(crate) fn ensure_row(ok: bool, table: &str, reason: impl FnOnce() -> String) -> ClientResult<()> {
    if ok {
        Ok(())
    } else {
        Err(ClientError::InvalidResponse(format!("{}: {}", table, reason())))
    }
}

pub(crate) fn non_negative(amount: Decimal) -> bool {
    !amount.is_sign_negative() || amount.is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_id() {
        assert!(require_id("user_id", "u1").is_ok());
        assert!(matches!(require_id("user_id", "  "), Err(ClientError::Validation(_))));
    }

    #[test]
    fn test_ensure_row() {
        assert!(ensure_row(true, "orders", || unreachable!()).is_ok());
        let err = ensure_row(false, "orders", || "negative total".to_string()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(ref m) if m == "orders: negative total"));
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative(Decimal::ZERO));
        assert!(non_negative(Decimal::ONE));
        assert!(!non_negative(-Decimal::ONE));
    }
}
