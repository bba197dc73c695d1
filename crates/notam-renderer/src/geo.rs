//! Great-circle footprint geometry.

/// Mean Earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.07;

/// Points per footprint ring, one per degree of bearing.
pub const RING_POINTS: u32 = 360;

/// Location reached by travelling `distance_nm` from `(lat_deg, lon_deg)`
/// along the given initial bearing, on a spherical Earth.
///
/// Returns `(lat_deg, lon_deg)`; the longitude is not normalized, callers
/// wrap it when projecting.
pub fn destination_point(
    lat_deg: f64,
    lon_deg: f64,
    bearing_deg: f64,
    distance_nm: f64,
) -> (f64, f64) {
    let lat1 = lat_deg.to_radians();
    let lon1 = lon_deg.to_radians();
    let bearing = bearing_deg.to_radians();
    let angular = distance_nm / EARTH_RADIUS_NM;

    let lat2 =
        (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    (lat2.to_degrees(), lon2.to_degrees())
}

/// Ring of `(lat_deg, lon_deg)` points at `radius_nm` around a center, one
/// per degree of bearing.
pub fn footprint_ring(lat_deg: f64, lon_deg: f64, radius_nm: f64) -> Vec<(f64, f64)> {
    (0..RING_POINTS)
        .map(|bearing| destination_point(lat_deg, lon_deg, f64::from(bearing), radius_nm))
        .collect()
}

/// Great-circle distance between two points in nautical miles (haversine).
pub fn haversine_distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_NM * a.sqrt().asin()
}
