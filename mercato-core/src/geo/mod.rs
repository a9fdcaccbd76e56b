//! Distance helpers for restaurant listings

use shared::models::{GeoPoint, Restaurant};

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres (haversine)
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Restaurants paired with their distance from `origin`, nearest first
///
/// Restaurants without valid coordinates sort last with no distance.
pub fn sort_by_distance(origin: GeoPoint, restaurants: Vec<Restaurant>) -> Vec<(Restaurant, Option<f64>)> {
    let mut ranked: Vec<(Restaurant, Option<f64>)> = restaurants
        .into_iter()
        .map(|r| {
            let distance = r
                .location()
                .filter(GeoPoint::is_valid)
                .map(|p| distance_km(origin, p));
            (r, distance)
        })
        .collect();

    ranked.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    ranked
}

/// "850 m" below one kilometre, "2.4 km" above
pub fn format_distance(km: f64) -> String {
    let metres = (km * 1000.0).round();
    if metres < 1000.0 {
        format!("{} m", metres as i64)
    } else {
        format!("{:.1} km", km)
    }
}
