//! Pure geographic and presentational math.
//!
//! Everything here is deterministic and side-effect free so it can be
//! snapshot-tested without touching the network.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Earth radius used for mile-denominated distances.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;
/// Earth radius used for kilometer-denominated distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic coordinate, longitude first.
///
/// The `[lng, lat]` ordering matches the Mapbox wire format and is preserved
/// on every boundary; a swapped pair is a silent correctness bug, so the
/// serialized form is pinned to a two-element array here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    #[must_use]
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Renders the coordinate as the `"lng,lat"` pair Mapbox expects in
    /// `proximity` and directions path parameters.
    #[must_use]
    pub fn as_param(&self) -> String {
        format!("{},{}", self.lng, self.lat)
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(pair: [f64; 2]) -> Self {
        Self {
            lng: pair[0],
            lat: pair[1],
        }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(coord: LngLat) -> Self {
        [coord.lng, coord.lat]
    }
}

/// Converts degrees to radians.
#[must_use]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

fn haversine(a: LngLat, b: LngLat, radius: f64) -> f64 {
    let d_lat = to_radians(b.lat - a.lat);
    let d_lng = to_radians(b.lng - a.lng);
    let h = (d_lat / 2.0).sin().powi(2)
        + to_radians(a.lat).cos() * to_radians(b.lat).cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    radius * c
}

/// Great-circle distance between two coordinates in miles.
#[must_use]
pub fn haversine_miles(a: LngLat, b: LngLat) -> f64 {
    haversine(a, b, EARTH_RADIUS_MILES)
}

/// Great-circle distance between two coordinates in kilometers.
#[must_use]
pub fn haversine_km(a: LngLat, b: LngLat) -> f64 {
    haversine(a, b, EARTH_RADIUS_KM)
}

/// Deterministic hue pair for a display name.
///
/// Rolling hash over UTF-16 code units (`hash = code + ((hash << 5) - hash)`
/// with i32 wrapping), mapped to a base hue and a +40° companion. Used only
/// for presentational grouping; kept here so it stays a pure, separately
/// testable utility.
#[must_use]
pub fn name_to_color_pair(name: &str) -> (u32, u32) {
    let mut hash: i32 = 0;
    for unit in name.encode_utf16() {
        hash = i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }
    let hue1 = hash.unsigned_abs() % 360;
    let hue2 = (hue1 + 40) % 360;
    (hue1, hue2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOS_ANGELES: LngLat = LngLat {
        lng: -118.2437,
        lat: 34.0522,
    };

    #[test]
    fn haversine_zero_for_identical_points() {
        assert!(haversine_miles(LOS_ANGELES, LOS_ANGELES).abs() < 1e-9);
        assert!(haversine_km(LOS_ANGELES, LOS_ANGELES).abs() < 1e-9);
    }

    #[test]
    fn haversine_is_symmetric() {
        let b = LngLat::new(-97.7431, 30.2672);
        let ab = haversine_miles(LOS_ANGELES, b);
        let ba = haversine_miles(b, LOS_ANGELES);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn haversine_matches_known_one_mile_pair() {
        // Two points on the same meridian ~1 mile apart in downtown LA.
        let north = LngLat::new(-118.2437, 34.0667);
        let miles = haversine_miles(LOS_ANGELES, north);
        assert!(
            (miles - 1.0).abs() < 0.1,
            "expected ~1.0 mi, got {miles}"
        );
    }

    #[test]
    fn haversine_km_uses_km_radius() {
        let north = LngLat::new(-118.2437, 34.0667);
        let miles = haversine_miles(LOS_ANGELES, north);
        let km = haversine_km(LOS_ANGELES, north);
        assert!((km / miles - EARTH_RADIUS_KM / EARTH_RADIUS_MILES).abs() < 1e-9);
    }

    #[test]
    fn to_radians_converts_degrees() {
        assert!((to_radians(180.0) - PI).abs() < 1e-12);
        assert!(to_radians(0.0).abs() < 1e-12);
    }

    #[test]
    fn color_pair_is_deterministic() {
        let a = name_to_color_pair("Electric Anvil Tattoo");
        let b = name_to_color_pair("Electric Anvil Tattoo");
        assert_eq!(a, b);
    }

    #[test]
    fn color_pair_hues_are_in_range_and_offset() {
        for name in ["", "Ink", "Black Lotus Studio", "名前"] {
            let (h1, h2) = name_to_color_pair(name);
            assert!(h1 < 360);
            assert!(h2 < 360);
            assert_eq!(h2, (h1 + 40) % 360);
        }
    }

    #[test]
    fn lnglat_serializes_longitude_first() {
        let json = serde_json::to_string(&LOS_ANGELES).expect("serialize");
        assert_eq!(json, "[-118.2437,34.0522]");

        let back: LngLat = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, LOS_ANGELES);
    }

    #[test]
    fn as_param_is_lng_comma_lat() {
        assert_eq!(LOS_ANGELES.as_param(), "-118.2437,34.0522");
    }
}
