//! Checkout draft
//!
//! Turns the cart into the `orders` insert payload. Amounts sent to the
//! backend are rounded to cents; the total never goes below zero.

use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{NewOrder, OrderLine, OrderStatus, Restaurant, ServiceType};
use tracing::info;

use crate::cart::CartState;
use crate::money::{round_money, validate_price};
use crate::promo::PromoVerdict;

/// Everything the order needs besides the cart contents
#[derive(Debug, Clone)]
pub struct CheckoutRequest<'a> {
    pub user_id: &'a str,
    pub service_type: ServiceType,
    pub delivery_fee: Decimal,
    /// Verdict of the code entered at checkout; ignored unless valid
    pub promo: Option<&'a PromoVerdict>,
    pub delivery_address: Option<String>,
}

/// Service and delivery terms of the restaurant the cart belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTerms {
    pub service_type: ServiceType,
    pub delivery_fee: Decimal,
}

impl CartTerms {
    /// Terms of `restaurant`; without one, the default service type and
    /// `default_delivery_fee`
    pub fn resolve(restaurant: Option<&Restaurant>, default_delivery_fee: Decimal) -> Self {
        match restaurant {
            Some(r) => Self {
                service_type: r.service_type,
                delivery_fee: r.delivery_fee,
            },
            None => Self {
                service_type: ServiceType::default(),
                delivery_fee: default_delivery_fee,
            },
        }
    }
}

/// Build the order payload for the current cart
pub fn build_order(cart: &CartState, request: &CheckoutRequest<'_>) -> AppResult<NewOrder> {
    if cart.is_empty() {
        return Err(AppError::cart_empty());
    }
    let Some(restaurant_id) = cart.restaurant_id.clone() else {
        return Err(AppError::cart_empty());
    };

    if request.user_id.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::NotAuthenticated,
            "Sign in to place an order",
        ));
    }
    validate_price(request.delivery_fee, "delivery_fee")?;

    let items = cart
        .items
        .iter()
        .map(|item| {
            validate_price(item.price, "price")?;
            Ok(OrderLine {
                menu_item_id: item.menu_item_id.clone(),
                name: item.name.clone(),
                unit_price: item.price,
                quantity: item.quantity,
                special_instructions: item.special_instructions.clone(),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let (discount_amount, promo_code) = match request.promo.filter(|v| v.valid) {
        Some(verdict) => (verdict.discount_amount, Some(verdict.code.clone())),
        None => (Decimal::ZERO, None),
    };

    let subtotal = cart.subtotal();
    let service_fee = cart.service_fee();
    let tax = cart.tax();
    let total = (subtotal + tax + service_fee + request.delivery_fee - discount_amount)
        .max(Decimal::ZERO);

    let order = NewOrder {
        user_id: request.user_id.to_string(),
        restaurant_id,
        service_type: request.service_type,
        items,
        subtotal: round_money(subtotal),
        service_fee: round_money(service_fee),
        tax: round_money(tax),
        delivery_fee: round_money(request.delivery_fee),
        discount_amount: round_money(discount_amount),
        total_amount: round_money(total),
        promo_code,
        delivery_address: request.delivery_address.clone(),
        status: OrderStatus::Pending,
    };

    info!(
        restaurant_id = %order.restaurant_id,
        lines = order.items.len(),
        total = %order.total_amount,
        "Order draft built"
    );
    Ok(order)
}
