//! Spatial primitives: raw lat/lng positions and straight-line distance.
//!
//! Positions are free coordinates reported by units in the field, not grid
//! cells, so distance is plain haversine over the WGS84 mean radius.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres, as used by the haversine formula.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Haversine distance between two points in kilometres.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lng.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Travel minutes for the coarse linear dashboard model, rounded to the
/// nearest minute.
pub fn linear_eta_minutes(distance_km: f64, speed_kmh: f64) -> u64 {
    if speed_kmh <= 0.0 {
        return 0;
    }
    (distance_km / speed_kmh * 60.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const SF: GeoPoint = GeoPoint {
        lat: 37.7749,
        lng: -122.4194,
    };
    const OAKLAND: GeoPoint = GeoPoint {
        lat: 37.8044,
        lng: -122.2712,
    };
    const BERKELEY: GeoPoint = GeoPoint {
        lat: 37.8715,
        lng: -122.2730,
    };

    #[test]
    fn distance_is_zero_for_identical_points() {
        assert_eq!(distance_km(SF, SF), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let forward = distance_km(SF, OAKLAND);
        let backward = distance_km(OAKLAND, SF);
        assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn distance_satisfies_triangle_inequality() {
        let direct = distance_km(SF, BERKELEY);
        let via_oakland = distance_km(SF, OAKLAND) + distance_km(OAKLAND, BERKELEY);
        assert!(direct <= via_oakland + 1e-9);
    }

    #[test]
    fn sf_to_oakland_is_roughly_13_km() {
        let d = distance_km(SF, OAKLAND);
        assert!(d > 10.0 && d < 16.0, "unexpected distance: {d}");
    }

    #[test]
    fn linear_eta_rounds_to_nearest_minute() {
        // 10 km at 50 km/h = 12 minutes exactly.
        assert_eq!(linear_eta_minutes(10.0, 50.0), 12);
        // 10.4 km at 50 km/h = 12.48 min -> 12.
        assert_eq!(linear_eta_minutes(10.4, 50.0), 12);
        // 10.5 km at 50 km/h = 12.6 min -> 13.
        assert_eq!(linear_eta_minutes(10.5, 50.0), 13);
    }
}
