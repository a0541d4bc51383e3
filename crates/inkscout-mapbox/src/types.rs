//! Mapbox API wire types.
//!
//! All types model the JSON structures the Mapbox endpoints actually return.
//! Optional or occasionally absent fields carry `#[serde(default)]` so a
//! sparse response degrades to empty values instead of a parse failure:
//! a missing `suggestions` array is an empty result, not an error.

use serde::Deserialize;

use inkscout_core::geo::LngLat;

// ---------------------------------------------------------------------------
// Search Box: suggest
// ---------------------------------------------------------------------------

/// Envelope for `GET /search/searchbox/v1/suggest`.
#[derive(Debug, Deserialize)]
pub struct SuggestResponse {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

/// A first-phase search hit: named and addressed but not yet positioned.
/// Exists only to be filtered and then resolved via `retrieve`.
#[derive(Debug, Clone, Deserialize)]
pub struct Suggestion {
    pub mapbox_id: String,
    pub name: String,
    #[serde(default)]
    pub place_formatted: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub feature_type: Option<String>,
    #[serde(default)]
    pub poi_category: Vec<String>,
}

// ---------------------------------------------------------------------------
// Search Box: retrieve
// ---------------------------------------------------------------------------

/// Envelope for `GET /search/searchbox/v1/retrieve/{id}`.
#[derive(Debug, Deserialize)]
pub struct RetrieveResponse {
    #[serde(default)]
    pub features: Vec<RetrieveFeature>,
}

/// A fully resolved Search Box feature.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrieveFeature {
    pub geometry: PointGeometry,
    pub properties: RetrieveProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointGeometry {
    pub coordinates: LngLat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrieveProperties {
    #[serde(default)]
    pub mapbox_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub place_formatted: Option<String>,
    #[serde(default)]
    pub tel: Option<String>,
    #[serde(default)]
    pub poi_category: Vec<String>,
}

// ---------------------------------------------------------------------------
// Geocoding v5
// ---------------------------------------------------------------------------

/// Envelope for `GET /geocoding/v5/mapbox.places/{query}.json`.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub features: Vec<GeocodeFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeFeature {
    pub id: String,
    pub text: String,
    pub place_name: String,
    pub geometry: PointGeometry,
    #[serde(default)]
    pub context: Vec<GeocodeContext>,
    #[serde(default)]
    pub properties: GeocodeProperties,
}

/// An entry of the geocoding `context` hierarchy. The `id` prefix encodes
/// the level (`place.…`, `region.…`, `country.…`).
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeContext {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeProperties {
    /// Comma-separated category list, e.g. `"tattoo parlour, body piercing"`.
    #[serde(default)]
    pub category: Option<String>,
}

// ---------------------------------------------------------------------------
// Directions v5
// ---------------------------------------------------------------------------

/// Envelope for `GET /directions/v5/{profile}/{coordinates}`.
///
/// `code` is `"Ok"` on success; anything else carries a human-readable
/// `message`.
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    pub geometry: LineGeometry,
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    #[serde(default)]
    pub legs: Vec<serde_json::Value>,
}

/// GeoJSON line geometry as returned with `geometries=geojson`.
#[derive(Debug, Clone, Deserialize)]
pub struct LineGeometry {
    #[serde(default)]
    pub coordinates: Vec<LngLat>,
}
