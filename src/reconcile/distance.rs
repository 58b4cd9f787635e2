//! Great-circle distance on a spherical Earth.

use crate::models::Located;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two lat/lon pairs in decimal degrees.
///
/// Non-finite inputs yield NaN.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Haversine distance between two located values
pub fn distance_m<A: Located + ?Sized, B: Located + ?Sized>(a: &A, b: &B) -> f64 {
    let (pa, pb) = (a.point(), b.point());
    haversine_m(pa.y(), pa.x(), pb.y(), pb.x())
}
