use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use inkscout_core::geo::LngLat;
use inkscout_core::place::PlaceResult;

use super::{map_provider_error, normalize_limit, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    #[serde(default)]
    q: Option<String>,
    lon: Option<f64>,
    lat: Option<f64>,
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResponse {
    results: Vec<PlaceResult>,
}

/// One-shot POI text search, optionally biased toward a position.
pub(super) async fn text_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let proximity = match (params.lon, params.lat) {
        (Some(lon), Some(lat)) => Some(LngLat::new(lon, lat)),
        _ => None,
    };
    let limit = normalize_limit(params.limit);

    let results = state
        .aggregator
        .text_search(params.q.as_deref().unwrap_or_default(), proximity, limit)
        .await
        .map_err(|e| map_provider_error(&e))?;

    Ok(Json(SearchResponse { results }))
}
