use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use inkscout_core::geo::LngLat;
use inkscout_core::place::RouteResult;
use inkscout_search::RouteError;

use super::{map_provider_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct DirectionsQuery {
    origin: Option<String>,
    destination: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct DirectionsResponse {
    route: RouteResult,
}

/// Driving route between two `"lng,lat"` endpoints.
pub(super) async fn get_directions(
    State(state): State<AppState>,
    Query(params): Query<DirectionsQuery>,
) -> Result<Json<DirectionsResponse>, ApiError> {
    let (Some(origin), Some(destination)) = (params.origin, params.destination) else {
        return Err(ApiError::new(
            "validation_error",
            "origin and destination are required",
        ));
    };
    let origin = parse_lng_lat(&origin)
        .ok_or_else(|| ApiError::new("validation_error", "origin must be \"lng,lat\""))?;
    let destination = parse_lng_lat(&destination)
        .ok_or_else(|| ApiError::new("validation_error", "destination must be \"lng,lat\""))?;

    let route = state
        .routes
        .fetch(origin, destination)
        .await
        .map_err(|e| match e {
            RouteError::Provider(inner) => map_provider_error(&inner),
        })?;

    Ok(Json(DirectionsResponse { route }))
}

/// Parses a `"lng,lat"` pair, rejecting out-of-range coordinates.
fn parse_lng_lat(raw: &str) -> Option<LngLat> {
    let (lng, lat) = raw.split_once(',')?;
    let lng: f64 = lng.trim().parse().ok()?;
    let lat: f64 = lat.trim().parse().ok()?;
    if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
        return None;
    }
    Some(LngLat::new(lng, lat))
}

#[cfg(test)]
mod tests {
    use super::parse_lng_lat;
    use inkscout_core::geo::LngLat;

    #[test]
    fn parses_a_valid_pair() {
        assert_eq!(
            parse_lng_lat("-97.7431,30.2672"),
            Some(LngLat::new(-97.7431, 30.2672))
        );
        assert_eq!(
            parse_lng_lat(" -97.7431 , 30.2672 "),
            Some(LngLat::new(-97.7431, 30.2672))
        );
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert_eq!(parse_lng_lat(""), None);
        assert_eq!(parse_lng_lat("-97.7431"), None);
        assert_eq!(parse_lng_lat("a,b"), None);
        assert_eq!(parse_lng_lat("-97.7431;30.2672"), None);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        // A swapped pair puts latitude in the longitude slot; the magnitude
        // check catches the common case.
        assert_eq!(parse_lng_lat("30.2672,-197.7431"), None);
        assert_eq!(parse_lng_lat("-97.7431,95.0"), None);
    }
}
