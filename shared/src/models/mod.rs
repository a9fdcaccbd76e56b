//! Data models
//!
//! Row and payload types exchanged with the managed backend, plus the cart
//! types held on the client. All IDs are opaque strings (backend UUIDs).
//! Monetary values are `Decimal` and travel as JSON numbers.

pub mod cart;
pub mod experiment;
pub mod favorite;
pub mod location;
pub mod menu_item;
pub mod order;
pub mod promo_code;
pub mod restaurant;
pub mod service;

// Re-exports
pub use cart::*;
pub use experiment::*;
pub use favorite::*;
pub use location::*;
pub use menu_item::*;
pub use order::*;
pub use promo_code::*;
pub use restaurant::*;
pub use service::*;
