//! Restaurant Model

use super::{GeoPoint, ServiceType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Restaurant (or other listing) row from the `restaurants` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub cuisine_type: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub min_order_amount: Option<Decimal>,
    /// Estimated delivery time in minutes
    pub estimated_delivery_minutes: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default = "default_true")]
    pub is_open: bool,
    #[serde(default)]
    pub service_type: ServiceType,
}

fn default_true() -> bool {
    true
}

impl Restaurant {
    /// Location, when both coordinates are present
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }
    }
}
