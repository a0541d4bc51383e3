use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use inkscout_core::geo::LngLat;

use super::{map_provider_error, ApiError, AppState};

const DEFAULT_CONTOURS_MINUTES: &str = "5,10,15";

#[derive(Debug, Deserialize)]
pub(super) struct IsochroneQuery {
    lng: Option<f64>,
    lat: Option<f64>,
    #[serde(default)]
    minutes: Option<String>,
}

/// Drive-time contour polygons around a point, passed through uninterpreted.
pub(super) async fn get_isochrone(
    State(state): State<AppState>,
    Query(params): Query<IsochroneQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (Some(lng), Some(lat)) = (params.lng, params.lat) else {
        return Err(ApiError::new("validation_error", "lng and lat are required"));
    };

    let minutes = params
        .minutes
        .unwrap_or_else(|| DEFAULT_CONTOURS_MINUTES.to_string());

    let contours = state
        .client
        .isochrone(LngLat::new(lng, lat), &minutes)
        .await
        .map_err(|e| map_provider_error(&e))?;

    Ok(Json(contours))
}
