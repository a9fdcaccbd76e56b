//! Service Type Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marketplace vertical an order, restaurant or promo code belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Food delivery
    #[default]
    Food,
    /// Hotel stays
    Hotel,
    /// Venues and experiences
    Venue,
    /// Ride-hailing
    Ride,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [Self::Food, Self::Hotel, Self::Venue, Self::Ride];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Hotel => "hotel",
            Self::Venue => "venue",
            Self::Ride => "ride",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "hotel" => Ok(Self::Hotel),
            "venue" => Ok(Self::Venue),
            "ride" => Ok(Self::Ride),
            other => Err(format!("unknown service type: {other}")),
        }
    }
}
