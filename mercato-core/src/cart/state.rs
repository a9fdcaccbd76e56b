//! Cart state machine
//!
//! Pure transitions over [`CartState`]. Every mutating operation takes the
//! current time so expiry is evaluated before the operation is applied.
//! No operation fails: invalid input is clamped (a non-positive quantity
//! removes the item, quantities stop at [`MAX_ITEM_QUANTITY`]) and unknown
//! ids are ignored.

use crate::money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{CartItem, CartItemInput};
use tracing::{debug, info};

/// Cart lifetime after the most recent add (24 hours)
pub const CART_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Upper bound on a single line's quantity
pub const MAX_ITEM_QUANTITY: i32 = 999;

/// Result of [`CartState::add_item`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended
    Added,
    /// An existing line's quantity was incremented
    Incremented,
    /// The item belongs to another restaurant; it is held as pending and the
    /// conflict prompt is raised
    Conflict,
}

/// Display breakdown of the cart totals, rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartTotals {
    pub item_count: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub service_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// The single-restaurant cart
///
/// Invariant: `items` is non-empty exactly when `restaurant_id`,
/// `restaurant_name` and `expires_at` are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub restaurant_id: Option<String>,
    pub restaurant_name: Option<String>,
    /// Unix millis after which the cart is discarded
    pub expires_at: Option<i64>,
    /// Item waiting for the user to confirm a restaurant switch
    #[serde(skip)]
    pub pending_item: Option<CartItemInput>,
    #[serde(skip)]
    pub show_restaurant_conflict: bool,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a line by its source menu item id
    pub fn item(&self, menu_item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.menu_item_id == menu_item_id)
    }

    /// Whether the cart holds items whose expiry has passed
    pub fn is_expired(&self, now: i64) -> bool {
        !self.items.is_empty() && self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Clear the cart if it has expired. Returns true when it was cleared.
    pub fn check_expiry(&mut self, now: i64) -> bool {
        if self.is_expired(now) {
            info!(
                restaurant_id = ?self.restaurant_id,
                items = self.items.len(),
                "Cart expired, clearing"
            );
            self.clear();
            return true;
        }
        false
    }

    /// Add one unit of a menu item
    pub fn add_item(&mut self, input: CartItemInput, now: i64) -> AddOutcome {
        self.check_expiry(now);

        if !self.items.is_empty() && self.restaurant_id.as_deref() != Some(input.restaurant_id.as_str())
        {
            info!(
                current_restaurant = ?self.restaurant_id,
                requested_restaurant = %input.restaurant_id,
                "Item from another restaurant, awaiting confirmation"
            );
            self.pending_item = Some(input);
            self.show_restaurant_conflict = true;
            return AddOutcome::Conflict;
        }

        let outcome = match self
            .items
            .iter_mut()
            .find(|i| i.menu_item_id == input.menu_item_id)
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(1).min(MAX_ITEM_QUANTITY);
                debug!(
                    menu_item_id = %existing.menu_item_id,
                    quantity = existing.quantity,
                    "Cart item incremented"
                );
                AddOutcome::Incremented
            }
            None => {
                let item = CartItem::from_input(shared::util::new_id(), &input);
                debug!(menu_item_id = %item.menu_item_id, "Cart item added");
                self.items.push(item);
                self.restaurant_id = Some(input.restaurant_id);
                self.restaurant_name = Some(input.restaurant_name);
                AddOutcome::Added
            }
        };

        self.expires_at = Some(now + CART_TTL_MS);
        outcome
    }

    /// Remove one unit of a menu item; the last unit removes the line.
    /// Returns false when the item is not in the cart.
    pub fn remove_item(&mut self, menu_item_id: &str, now: i64) -> bool {
        self.check_expiry(now);

        let Some(pos) = self.position(menu_item_id) else {
            return false;
        };

        if self.items[pos].quantity <= 1 {
            self.items.remove(pos);
            debug!(menu_item_id, "Cart item removed");
        } else {
            self.items[pos].quantity -= 1;
            debug!(
                menu_item_id,
                quantity = self.items[pos].quantity,
                "Cart item decremented"
            );
        }

        self.reset_if_empty();
        true
    }

    /// Set the quantity of a line; `quantity <= 0` removes it entirely.
    /// Returns false when the item is not in the cart.
    pub fn update_quantity(&mut self, menu_item_id: &str, quantity: i32, now: i64) -> bool {
        self.check_expiry(now);

        let Some(pos) = self.position(menu_item_id) else {
            return false;
        };

        if quantity <= 0 {
            self.items.remove(pos);
            debug!(menu_item_id, quantity, "Cart item removed by quantity update");
            self.reset_if_empty();
        } else {
            let quantity = quantity.min(MAX_ITEM_QUANTITY);
            self.items[pos].quantity = quantity;
            debug!(menu_item_id, quantity, "Cart item quantity set");
        }
        true
    }

    /// Set or clear preparation instructions; blank text clears them.
    /// Returns false when the item is not in the cart.
    pub fn update_instructions(
        &mut self,
        menu_item_id: &str,
        instructions: Option<String>,
        now: i64,
    ) -> bool {
        self.check_expiry(now);

        let Some(pos) = self.position(menu_item_id) else {
            return false;
        };

        self.items[pos].special_instructions = instructions
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        true
    }

    /// Replace the cart with the pending item from another restaurant.
    /// Returns false when there is no pending item.
    pub fn confirm_restaurant_change(&mut self, now: i64) -> bool {
        let Some(pending) = self.pending_item.take() else {
            self.show_restaurant_conflict = false;
            return false;
        };

        info!(
            previous_restaurant = ?self.restaurant_id,
            restaurant_id = %pending.restaurant_id,
            discarded_items = self.items.len(),
            "Restaurant change confirmed"
        );

        self.items = vec![CartItem::from_input(shared::util::new_id(), &pending)];
        self.restaurant_id = Some(pending.restaurant_id);
        self.restaurant_name = Some(pending.restaurant_name);
        self.expires_at = Some(now + CART_TTL_MS);
        self.show_restaurant_conflict = false;
        true
    }

    /// Dismiss the restaurant-conflict prompt, keeping the current cart
    pub fn cancel_restaurant_change(&mut self) {
        self.pending_item = None;
        self.show_restaurant_conflict = false;
    }

    /// Empty the cart and drop any pending conflict
    pub fn clear(&mut self) {
        self.items.clear();
        self.restaurant_id = None;
        self.restaurant_name = None;
        self.expires_at = None;
        self.pending_item = None;
        self.show_restaurant_conflict = false;
    }

    // ========== Derived values ==========

    /// Σ price × quantity
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn service_fee(&self) -> Decimal {
        money::service_fee(self.subtotal())
    }

    pub fn tax(&self) -> Decimal {
        money::tax(self.subtotal())
    }

    /// subtotal + tax + service fee + delivery fee
    pub fn total(&self, delivery_fee: Decimal) -> Decimal {
        self.subtotal() + self.tax() + self.service_fee() + delivery_fee
    }

    /// Σ quantity
    pub fn total_items(&self) -> i32 {
        self.items
            .iter()
            .fold(0i32, |acc, i| acc.saturating_add(i.quantity))
    }

    pub fn totals(&self, delivery_fee: Decimal) -> CartTotals {
        let subtotal = self.subtotal();
        let service_fee = money::service_fee(subtotal);
        let tax = money::tax(subtotal);
        CartTotals {
            item_count: self.total_items(),
            subtotal: money::round_money(subtotal),
            service_fee: money::round_money(service_fee),
            tax: money::round_money(tax),
            delivery_fee: money::round_money(delivery_fee),
            total: money::round_money(subtotal + tax + service_fee + delivery_fee),
        }
    }

    /// Whether the state satisfies the cart invariants: every quantity is
    /// within `1..=MAX_ITEM_QUANTITY`, every line belongs to the cart's
    /// restaurant, and the restaurant and expiry are set exactly when the
    /// cart has items.
    pub fn is_well_formed(&self) -> bool {
        let header_set = self.restaurant_id.is_some()
            && self.restaurant_name.is_some()
            && self.expires_at.is_some();
        let header_clear = self.restaurant_id.is_none()
            && self.restaurant_name.is_none()
            && self.expires_at.is_none();

        if self.items.is_empty() {
            return header_clear;
        }
        header_set
            && self.items.iter().all(|i| {
                (1..=MAX_ITEM_QUANTITY).contains(&i.quantity)
                    && self.restaurant_id.as_deref() == Some(i.restaurant_id.as_str())
            })
    }

    fn position(&self, menu_item_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.menu_item_id == menu_item_id)
    }

    fn reset_if_empty(&mut self) {
        if self.items.is_empty() {
            self.restaurant_id = None;
            self.restaurant_name = None;
            self.expires_at = None;
        }
    }
}
