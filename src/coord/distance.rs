//! Great-circle distance
//!
//! Haversine distance on a spherical Earth of radius 6371 km.

use crate::constants::geo::EARTH_RADIUS_KM;
use crate::coord::Coordinate;
use std::f64::consts::PI;

/// Calculate the distance between two points in kilometers (Haversine formula)
///
/// # Arguments
/// * `p1` - First point
/// * `p2` - Second point
///
/// # Returns
/// Distance in kilometers
///
/// # Algorithm
/// - a = sin²(Δφ/2) + cos(φ1)·cos(φ2)·sin²(Δλ/2)
/// - c = 2·atan2(√a, √(1−a))
/// - d = R·c
pub fn haversine_km(p1: Coordinate, p2: Coordinate) -> f64 {
    let lat1 = p1.lat * PI / 180.0;
    let lat2 = p2.lat * PI / 180.0;
    let delta_lat = (p2.lat - p1.lat) * PI / 180.0;
    let delta_lng = (p2.lng - p1.lng) * PI / 180.0;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Format a distance with two decimals, exact ties rounded away from zero
///
/// Rounding works on the exact binary value, so 0.105 (stored just below)
/// gives "0.10". A double sits exactly on a hundredths tie only when
/// `d * 8` is an odd integer; those are bumped up, since `{:.2}` alone
/// would round them to even.
pub fn format_km(distance_km: f64) -> String {
    let eighths = distance_km * 8.0;
    let exact_tie = eighths.is_finite() && eighths.fract() == 0.0 && eighths % 2.0 != 0.0;

    if exact_tie {
        let hundredths = distance_km * 100.0;
        let rounded = hundredths.abs().ceil().copysign(hundredths);
        format!("{:.2}", rounded / 100.0)
    } else {
        format!("{:.2}", distance_km)
    }
}
