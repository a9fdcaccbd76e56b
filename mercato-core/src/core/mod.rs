//! Core module: runtime configuration
//!
//! - [`Config`]: environment-driven settings shared by the CLI and library

pub mod config;

pub use config::{Config, DEFAULT_DELIVERY_FEE};
