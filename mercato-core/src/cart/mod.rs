//! Client-side shopping cart
//!
//! - [`state`]: the single-restaurant cart state machine and derived totals
//! - [`store`]: session store that persists every change
//! - [`persistence`]: versioned blob storage (memory and redb adapters)
//! - [`clock`]: injected time source for expiry
//! - [`catalog`]: menu item and restaurant checks before an add

pub mod catalog;
pub mod clock;
pub mod persistence;
pub mod state;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use persistence::{
    CART_SCHEMA_VERSION, CART_STORAGE_KEY, CartPersistence, MemoryCartStorage, RedbCartStorage,
    StorageError, StorageResult,
};
pub use state::{AddOutcome, CART_TTL_MS, CartState, CartTotals, MAX_ITEM_QUANTITY};
pub use store::CartStore;
