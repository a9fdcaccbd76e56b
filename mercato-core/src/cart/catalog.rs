//! Catalog lookups feeding the cart

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{MenuItem, Restaurant};

/// The menu item to add, if it exists and can be ordered
pub fn orderable_item(menu_item_id: &str, item: Option<MenuItem>) -> AppResult<MenuItem> {
    let Some(item) = item else {
        return Err(AppError::with_message(
            ErrorCode::MenuItemNotFound,
            format!("Menu item {} not found", menu_item_id),
        )
        .with_detail("menu_item_id", menu_item_id));
    };

    if !item.is_available {
        return Err(AppError::with_message(
            ErrorCode::MenuItemUnavailable,
            format!("{} is currently unavailable", item.name),
        )
        .with_detail("menu_item_id", item.id));
    }
    Ok(item)
}

/// The restaurant a menu item belongs to
pub fn owning_restaurant(restaurant_id: &str, restaurant: Option<Restaurant>) -> AppResult<Restaurant> {
    restaurant.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::RestaurantNotFound,
            format!("Restaurant {} not found", restaurant_id),
        )
        .with_detail("restaurant_id", restaurant_id)
    })
}
