//! Mercato Core - client-side logic of the Mercato marketplace
//!
//! # Overview
//!
//! Everything the marketplace client decides locally, independent of any UI:
//!
//! - **Cart** (`cart`): single-restaurant cart with conflict prompt, expiry
//!   and persisted state
//! - **Promo codes** (`promo`): validation waterfall and discount math
//! - **Chatbot** (`chatbot`): keyword intent matching with FAQ fallback
//! - **Experiments** (`experiments`): weighted A/B variant assignment
//! - **Checkout** (`checkout`): order payload from the cart
//!
//! # Module layout
//!
//! ```text
//! mercato-core/src/
//! ├── core/          # configuration
//! ├── cart/          # cart state, store, persistence
//! ├── money/         # decimal helpers, fees
//! ├── promo/         # promo validation
//! ├── chatbot/       # intent matcher
//! ├── experiments/   # A/B assignment
//! ├── checkout/      # order draft
//! ├── orders/        # history aggregation
//! ├── geo/           # distances
//! └── utils/         # logging
//! ```

pub mod cart;
pub mod chatbot;
pub mod checkout;
pub mod core;
pub mod experiments;
pub mod geo;
pub mod money;
pub mod orders;
pub mod promo;
pub mod utils;

use std::sync::Arc;

pub use cart::{AddOutcome, CartState, CartStore, CartTotals};
pub use chatbot::{ChatReply, Intent};
pub use core::Config;
pub use promo::{PromoCatalog, PromoContext, PromoRejection, PromoVerdict};
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the local environment: work directory and logging
pub fn setup_environment(config: &Config) -> AppResult<()> {
    std::fs::create_dir_all(&config.work_dir).map_err(|e| {
        AppError::config(format!(
            "cannot create work dir {}: {}",
            config.work_dir.display(),
            e
        ))
    })?;

    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(())
}

/// Open the persisted cart under the configured work directory
pub fn open_cart_store(config: &Config) -> AppResult<CartStore> {
    let storage = cart::RedbCartStorage::open(config.cart_db_path())?;
    Ok(CartStore::open(Arc::new(storage)))
}
