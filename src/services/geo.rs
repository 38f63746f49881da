use crate::models::place::GeoPoint;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two points (haversine)
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlat = (to.lat - from.lat).to_radians();
    let dlng = (to.lng - from.lng).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Renders a distance for display: meters rounded to the nearest ten below
/// one kilometer, one decimal of kilometers from there up
pub fn format_distance(km: f64) -> String {
    let meters = km * 1000.0;
    if meters < 1000.0 {
        let rounded = (meters / 10.0).round() * 10.0;
        // Rounding can land exactly on the kilometer boundary
        if rounded >= 1000.0 {
            return "1.0 km".to_string();
        }
        return format!("{} m", rounded as u32);
    }
    format!("{:.1} km", km)
}

/// Google Maps directions deep link for a destination point
pub fn directions_url(destination: GeoPoint) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        destination.lat, destination.lng
    )
}
