//! Shared types for Mercato
//!
//! Domain models exchanged with the managed backend, cart item types held on
//! the client, and the unified error types used across crates.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
