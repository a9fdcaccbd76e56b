//! Promo codes
//!
//! [`validate_promo`] is a pure decision over a code that was already looked
//! up; [`PromoCatalog`] does the case-insensitive lookup over a set of codes
//! fetched from the backend.

mod validator;

pub use validator::{PromoContext, PromoRejection, PromoVerdict, calculate_discount, validate_promo};

use shared::models::PromoCode;
use std::collections::HashMap;

/// Promo codes indexed by normalized code
#[derive(Debug, Clone, Default)]
pub struct PromoCatalog {
    codes: HashMap<String, PromoCode>,
}

impl PromoCatalog {
    pub fn new(codes: impl IntoIterator<Item = PromoCode>) -> Self {
        let codes = codes
            .into_iter()
            .map(|promo| (PromoCode::normalize(&promo.code), promo))
            .collect();
        Self { codes }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Look up a code as typed by the user (" save10 " finds "SAVE10")
    pub fn find(&self, code: &str) -> Option<&PromoCode> {
        self.codes.get(&PromoCode::normalize(code))
    }

    /// Look up and validate in one step
    pub fn validate(&self, code: &str, ctx: &PromoContext<'_>) -> PromoVerdict {
        validate_promo(self.find(code), ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use shared::models::{DiscountType, ServiceType};

    fn code(code: &str, value: i64) -> PromoCode {
        PromoCode {
            id: format!("id-{}", code),
            code: code.to_string(),
            description: None,
            discount_type: DiscountType::Fixed,
            discount_value: Decimal::from(value),
            min_order_amount: None,
            max_discount_amount: None,
            usage_limit: None,
            usage_count: 0,
            per_user_limit: None,
            valid_from: None,
            valid_until: None,
            applicable_restaurants: None,
            applicable_services: None,
            is_active: true,
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = PromoCatalog::new([code("SAVE10", 10), code("Welcome", 5)]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find(" save10 ").unwrap().id, "id-SAVE10");
        assert_eq!(catalog.find("WELCOME").unwrap().id, "id-Welcome");
        assert!(catalog.find("nope").is_none());
    }

    #[test]
    fn test_validate_unknown_code() {
        let catalog = PromoCatalog::new([code("SAVE10", 10)]);
        let ctx = PromoContext {
            order_total: Decimal::from(50),
            restaurant_id: None,
            service_type: ServiceType::Food,
            user_redemptions: 0,
            now: Utc::now(),
        };

        assert_eq!(catalog.validate("save10", &ctx).discount_amount, Decimal::from(10));
        assert_eq!(
            catalog.validate("other", &ctx).rejection,
            Some(PromoRejection::NotFound)
        );
    }
}
