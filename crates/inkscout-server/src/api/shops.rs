use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use inkscout_core::geo::LngLat;
use inkscout_core::place::PlaceResult;

use super::{map_provider_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ShopsQuery {
    lat: Option<f64>,
    lng: Option<f64>,
    #[serde(default)]
    q: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ShopsResponse {
    shops: Vec<PlaceResult>,
}

/// Two-phase category search around the caller's position.
pub(super) async fn list_shops(
    State(state): State<AppState>,
    Query(params): Query<ShopsQuery>,
) -> Result<Json<ShopsResponse>, ApiError> {
    let (Some(lat), Some(lng)) = (params.lat, params.lng) else {
        return Err(ApiError::new("validation_error", "lat and lng are required"));
    };
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(ApiError::new(
            "validation_error",
            "lat must be in [-90, 90] and lng in [-180, 180]",
        ));
    }

    let query = params.q.as_deref().unwrap_or_default();
    let shops = state
        .aggregator
        .search(LngLat::new(lng, lat), query)
        .await
        .map_err(|e| map_provider_error(&e))?;

    Ok(Json(ShopsResponse { shops }))
}
