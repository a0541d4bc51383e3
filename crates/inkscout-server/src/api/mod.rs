mod directions;
mod isochrone;
mod locations;
mod search;
mod shops;

use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use inkscout_mapbox::{MapboxClient, MapboxError};
use inkscout_search::{CategorySearchAggregator, RouteFetcher};

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<MapboxClient>,
    pub aggregator: Arc<CategorySearchAggregator>,
    pub routes: Arc<RouteFetcher>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: DateTime<Utc>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta {
                timestamp: Utc::now(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Translates a provider failure into the API error envelope.
///
/// Configuration problems are internal (the operator's concern); everything
/// the provider reported or the network dropped is an upstream failure.
pub(super) fn map_provider_error(error: &MapboxError) -> ApiError {
    tracing::error!(error = %error, "provider request failed");
    match error {
        MapboxError::MissingAccessToken => {
            ApiError::new("internal_error", "provider credential is not configured")
        }
        MapboxError::Api(message) => ApiError::new("upstream_error", message.clone()),
        MapboxError::Http(_) | MapboxError::Deserialize { .. } => {
            ApiError::new("upstream_error", "provider request failed")
        }
    }
}

/// Clamps a caller-supplied result limit into the supported range.
pub(super) fn normalize_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(15).clamp(1, 20)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE])
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

async fn health() -> Json<HealthData> {
    Json(HealthData { status: "ok" })
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/shops", get(shops::list_shops))
        .route("/api/search", get(search::text_search))
        .route("/api/location", get(locations::suggest_locations))
        .route("/api/directions", get(directions::get_directions))
        .route("/api/isochrone", get(isochrone::get_isochrone))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}
