use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

use crate::money::parse_money;

/// Default delivery fee when the restaurant does not set one (2.99)
pub const DEFAULT_DELIVERY_FEE: Decimal = Decimal::from_parts(299, 0, 0, false, 2);

/// Client configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | MERCATO_WORK_DIR | ./.mercato | Local state (cart database) |
/// | MERCATO_BACKEND_URL | http://localhost:54321 | Managed backend base URL |
/// | MERCATO_API_KEY | (empty) | Public API key sent as `apikey` |
/// | MERCATO_ACCESS_TOKEN | (unset) | Signed-in user's bearer token |
/// | MERCATO_USER_ID | (unset) | Signed-in user's id |
/// | MERCATO_REQUEST_TIMEOUT_SECS | 30 | Backend request timeout |
/// | MERCATO_DELIVERY_FEE | 2.99 | Fallback delivery fee |
/// | LOG_LEVEL | info | Log filter |
/// | LOG_DIR | (unset) | Daily rolling log files when set |
///
/// # Example
///
/// ```ignore
/// MERCATO_BACKEND_URL=https://project.example.co mercato cart show
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub backend_url: String,
    pub api_key: String,
    pub access_token: Option<String>,
    pub user_id: Option<String>,
    pub request_timeout: Duration,
    pub delivery_fee: Decimal,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    /// for unset or unparsable values
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("MERCATO_WORK_DIR")
                .unwrap_or_else(|_| "./.mercato".into())
                .into(),
            backend_url: std::env::var("MERCATO_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:54321".into()),
            api_key: std::env::var("MERCATO_API_KEY").unwrap_or_default(),
            access_token: non_empty_var("MERCATO_ACCESS_TOKEN"),
            user_id: non_empty_var("MERCATO_USER_ID"),
            request_timeout: Duration::from_secs(
                std::env::var("MERCATO_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
            delivery_fee: std::env::var("MERCATO_DELIVERY_FEE")
                .ok()
                .and_then(|v| parse_money(&v).ok())
                .filter(|fee| !fee.is_sign_negative())
                .unwrap_or(DEFAULT_DELIVERY_FEE),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: non_empty_var("LOG_DIR"),
        }
    }

    /// Override the work directory (tests, alternate profiles)
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    /// Path of the local cart database
    pub fn cart_db_path(&self) -> PathBuf {
        self.work_dir.join("cart.redb")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
