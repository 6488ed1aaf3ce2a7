use crate::models::GeoPoint;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in meters.
#[must_use]
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    // abs() keeps the result bit-identical when the arguments are swapped
    let d_lat = (b.lat - a.lat).abs().to_radians();
    let d_lng = (b.lng - a.lng).abs().to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c * 1000.0
}

/// Formats a distance as `"850 m"` or `"1.5 km"`. Halves round up.
#[must_use]
pub fn format_distance(meters: f64) -> String {
    // `{:.1}` alone rounds ties to even
    if meters >= 1000.0 {
        format!("{:.1} km", (meters / 100.0).round() / 10.0)
    } else {
        format!("{:.0} m", meters.round())
    }
}
