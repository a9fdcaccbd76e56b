//! Persisted cart store
//!
//! [`CartStore`] owns the session's [`CartState`], reads time from a
//! [`Clock`] and writes every change through a [`CartPersistence`] adapter.
//! It is the single writer of the persisted cart.

use super::clock::{Clock, SystemClock};
use super::persistence::{CART_STORAGE_KEY, CartPersistence, load_cart, save_cart};
use super::state::{AddOutcome, CartState, CartTotals};
use rust_decimal::Decimal;
use shared::models::{CartItem, CartItemInput};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct CartStore {
    state: CartState,
    persistence: Arc<dyn CartPersistence>,
    clock: Arc<dyn Clock>,
    key: String,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Open the store with the wall clock and the default storage key
    pub fn open(persistence: Arc<dyn CartPersistence>) -> Self {
        Self::with_clock(persistence, Arc::new(SystemClock))
    }

    pub fn with_clock(persistence: Arc<dyn CartPersistence>, clock: Arc<dyn Clock>) -> Self {
        Self::with_key(persistence, clock, CART_STORAGE_KEY)
    }

    /// Open the store under a custom storage key, hydrating any saved cart
    ///
    /// Stale or incompatible data is discarded; an expired cart is cleared
    /// and the cleared state written back.
    pub fn with_key(
        persistence: Arc<dyn CartPersistence>,
        clock: Arc<dyn Clock>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let state = match load_cart(persistence.as_ref(), &key) {
            Ok(Some(state)) => state,
            Ok(None) => CartState::new(),
            Err(e) => {
                warn!(error = %e, key = %key, "Failed to load persisted cart, starting empty");
                CartState::new()
            }
        };

        let mut store = Self {
            state,
            persistence,
            clock,
            key,
        };

        let now = store.clock.now_millis();
        if store.state.check_expiry(now) {
            store.persist();
        }

        debug!(items = store.state.items.len(), "Cart store opened");
        store
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn items(&self) -> &[CartItem] {
        &self.state.items
    }

    pub fn pending_item(&self) -> Option<&CartItemInput> {
        self.state.pending_item.as_ref()
    }

    pub fn has_restaurant_conflict(&self) -> bool {
        self.state.show_restaurant_conflict
    }

    // ========== Mutations ==========

    pub fn add_item(&mut self, input: CartItemInput) -> AddOutcome {
        let now = self.clock.now_millis();
        let outcome = self.state.add_item(input, now);
        self.persist();
        outcome
    }

    pub fn remove_item(&mut self, menu_item_id: &str) -> bool {
        let now = self.clock.now_millis();
        let found = self.state.remove_item(menu_item_id, now);
        self.persist();
        found
    }

    pub fn update_quantity(&mut self, menu_item_id: &str, quantity: i32) -> bool {
        let now = self.clock.now_millis();
        let found = self.state.update_quantity(menu_item_id, quantity, now);
        self.persist();
        found
    }

    pub fn update_instructions(&mut self, menu_item_id: &str, instructions: Option<String>) -> bool {
        let now = self.clock.now_millis();
        let found = self.state.update_instructions(menu_item_id, instructions, now);
        self.persist();
        found
    }

    pub fn confirm_restaurant_change(&mut self) -> bool {
        let now = self.clock.now_millis();
        let changed = self.state.confirm_restaurant_change(now);
        self.persist();
        changed
    }

    pub fn cancel_restaurant_change(&mut self) {
        self.state.cancel_restaurant_change();
    }

    pub fn clear_cart(&mut self) {
        self.state.clear();
        self.persist();
    }

    /// Clear the cart if it has expired. Returns true when it was cleared.
    pub fn check_expiry(&mut self) -> bool {
        let now = self.clock.now_millis();
        let cleared = self.state.check_expiry(now);
        if cleared {
            self.persist();
        }
        cleared
    }

    // ========== Derived values ==========

    pub fn subtotal(&self) -> Decimal {
        self.state.subtotal()
    }

    pub fn service_fee(&self) -> Decimal {
        self.state.service_fee()
    }

    pub fn tax(&self) -> Decimal {
        self.state.tax()
    }

    pub fn total(&self, delivery_fee: Decimal) -> Decimal {
        self.state.total(delivery_fee)
    }

    pub fn total_items(&self) -> i32 {
        self.state.total_items()
    }

    pub fn totals(&self, delivery_fee: Decimal) -> CartTotals {
        self.state.totals(delivery_fee)
    }

    /// Write the current state through; failures are logged, never surfaced
    fn persist(&self) {
        if let Err(e) = save_cart(self.persistence.as_ref(), &self.key, &self.state) {
            warn!(error = %e, key = %self.key, "Failed to persist cart");
        }
    }
}
