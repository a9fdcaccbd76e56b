//! Mercato Client - typed access to the managed backend
//!
//! Table CRUD and RPC over HTTP, with a typed error taxonomy and per-table
//! APIs for restaurants, menus, promo codes, orders, favorites and
//! experiments.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod query;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, DegradeExt, parse_backend_error};
pub use http::BackendClient;
pub use query::Query;
