//! Cart Item Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request to add one unit of a menu item to the cart
///
/// Also the shape of the pending item held while a restaurant-conflict
/// prompt is open.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItemInput {
    pub menu_item_id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub restaurant_id: String,
    pub restaurant_name: String,
}

/// One distinct menu item in the active cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Opaque identifier generated when the item was first added
    pub id: String,
    pub menu_item_id: String,
    pub name: String,
    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Always positive while the item is in the cart
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Free-text preparation instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub restaurant_id: String,
    pub restaurant_name: String,
}

impl CartItem {
    /// Create a new cart line with quantity one
    pub fn from_input(id: String, input: &CartItemInput) -> Self {
        Self {
            id,
            menu_item_id: input.menu_item_id.clone(),
            name: input.name.clone(),
            price: input.price,
            quantity: 1,
            image_url: input.image_url.clone(),
            special_instructions: None,
            restaurant_id: input.restaurant_id.clone(),
            restaurant_name: input.restaurant_name.clone(),
        }
    }

    /// price × quantity
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
