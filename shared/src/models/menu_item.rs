//! Menu Item Model

use super::CartItemInput;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu item row from the `menu_items` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl MenuItem {
    /// Build the add-to-cart request for this item
    pub fn to_cart_input(&self, restaurant_name: impl Into<String>) -> CartItemInput {
        CartItemInput {
            menu_item_id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image_url: self.image_url.clone(),
            restaurant_id: self.restaurant_id.clone(),
            restaurant_name: restaurant_name.into(),
        }
    }
}
