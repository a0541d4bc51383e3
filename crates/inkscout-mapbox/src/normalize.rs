//! Wire-type → domain-type normalization.
//!
//! Turns raw Mapbox features into the canonical [`PlaceResult`] shape.
//! Category defaulting and distance computation are search-pipeline policy
//! and happen downstream, not here.

use inkscout_core::place::PlaceResult;

use crate::types::{GeocodeFeature, RetrieveFeature, Suggestion};

/// Builds a [`PlaceResult`] from a resolved Search Box feature, falling back
/// to the originating suggestion for fields the detail record omits.
#[must_use]
pub fn place_from_retrieve(feature: &RetrieveFeature, suggestion: &Suggestion) -> PlaceResult {
    let properties = &feature.properties;
    PlaceResult {
        id: properties
            .mapbox_id
            .clone()
            .unwrap_or_else(|| suggestion.mapbox_id.clone()),
        name: properties
            .name
            .clone()
            .unwrap_or_else(|| suggestion.name.clone()),
        address: properties.address.clone().unwrap_or_default(),
        place_formatted: properties
            .place_formatted
            .clone()
            .unwrap_or_else(|| suggestion.place_formatted.clone()),
        coordinates: feature.geometry.coordinates,
        phone: properties.tel.clone(),
        categories: properties.poi_category.clone(),
        distance_miles: None,
    }
}

/// Builds a [`PlaceResult`] from a geocoding feature.
///
/// `place_formatted` is composed from the context hierarchy (place, region,
/// country joined with `", "`), falling back to the full `place_name` when
/// the context carries none of those levels.
#[must_use]
pub fn place_from_geocode(feature: GeocodeFeature) -> PlaceResult {
    let context_text = |prefix: &str| -> Option<String> {
        feature
            .context
            .iter()
            .find(|c| c.id.starts_with(prefix))
            .map(|c| c.text.clone())
    };

    let composite: Vec<String> = [
        context_text("place"),
        context_text("region"),
        context_text("country"),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect();

    let place_formatted = if composite.is_empty() {
        feature.place_name.clone()
    } else {
        composite.join(", ")
    };

    let categories = feature
        .properties
        .category
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    PlaceResult {
        id: feature.id,
        name: feature.text,
        address: feature.place_name,
        place_formatted,
        coordinates: feature.geometry.coordinates,
        phone: None,
        categories,
        distance_miles: None,
    }
}
