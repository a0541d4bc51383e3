//! Canonical domain records produced by search and routing.

use serde::{Deserialize, Serialize};

use crate::geo::LngLat;

/// A fully resolved point-of-interest result.
///
/// `distance_miles` is present only when the search had an origin to measure
/// from; when present it is non-negative, rounded to one decimal, and
/// determines result ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceResult {
    /// Provider-issued id, unique within one result set.
    pub id: String,
    pub name: String,
    pub address: String,
    /// Human-readable locality/region/country composite.
    pub place_formatted: String,
    pub coordinates: LngLat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
}

/// A driving route between two coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResult {
    /// Ordered line path; may be empty for a degenerate provider response.
    pub geometry: Vec<LngLat>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// Provider leg objects, passed through uninterpreted.
    #[serde(default)]
    pub legs: Vec<serde_json::Value>,
}
