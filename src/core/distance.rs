//! Great-circle distance between geographic points.

use crate::core::{constants::EARTH_RADIUS_KM, geo::LatLng};

/// Haversine distance between two points in kilometres.
///
/// Inputs are not validated: latitudes outside ±90° or longitudes outside
/// ±180° still produce a finite number, it just has no geographic meaning.
pub fn haversine_km(a: LatLng, b: LatLng) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
