use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use inkscout_mapbox::SessionToken;

use super::{map_provider_error, ApiError, AppState};

/// Feature types meaningful as a "where am I searching" answer; POI-level
/// hits are excluded from location autocomplete.
const LOCATION_FEATURE_TYPES: &[&str] = &["place", "postcode", "locality"];

const LOCATION_SUGGEST_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub(super) struct LocationQuery {
    #[serde(default)]
    q: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct LocationSuggestion {
    id: String,
    name: String,
    place_formatted: String,
    mapbox_id: String,
    feature_type: String,
}

#[derive(Debug, Serialize)]
pub(super) struct LocationResponse {
    suggestions: Vec<LocationSuggestion>,
}

/// Location autocomplete for the search origin picker.
pub(super) async fn suggest_locations(
    State(state): State<AppState>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<LocationResponse>, ApiError> {
    let query = params.q.as_deref().unwrap_or_default().trim().to_string();
    if query.is_empty() {
        return Ok(Json(LocationResponse {
            suggestions: Vec::new(),
        }));
    }

    let session = SessionToken::new();
    let candidates = state
        .client
        .suggest(&query, None, None, LOCATION_SUGGEST_LIMIT, &session)
        .await
        .map_err(|e| map_provider_error(&e))?;

    let suggestions = candidates
        .into_iter()
        .filter_map(|candidate| {
            let feature_type = candidate.feature_type?;
            if !LOCATION_FEATURE_TYPES.contains(&feature_type.as_str()) {
                return None;
            }
            Some(LocationSuggestion {
                id: candidate.mapbox_id.clone(),
                name: candidate.name,
                place_formatted: candidate.place_formatted,
                mapbox_id: candidate.mapbox_id,
                feature_type,
            })
        })
        .collect();

    Ok(Json(LocationResponse { suggestions }))
}
