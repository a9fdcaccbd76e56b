//! Favorite Model

use serde::{Deserialize, Serialize};

/// Row of the `favorites` table (one per user and restaurant)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Favorite {
    pub user_id: String,
    pub restaurant_id: String,
}
