//! HTTP client for the Mapbox REST APIs.
//!
//! Wraps `reqwest` with Mapbox-specific error handling, access-token
//! management, and typed response deserialization. Every call is a single
//! attempt, no retry logic; callers decide how a failure degrades.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};

use inkscout_core::geo::LngLat;

use crate::error::MapboxError;
use crate::session::SessionToken;
use crate::types::{
    DirectionsResponse, DirectionsRoute, GeocodeFeature, GeocodeResponse, RetrieveFeature,
    RetrieveResponse, SuggestResponse, Suggestion,
};

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/";

/// Driving profile used for directions and isochrone requests.
const DRIVING_PROFILE: &str = "mapbox/driving";

/// Client for the Mapbox search, geocoding, and navigation endpoints.
///
/// Manages the HTTP client, access token, and base URL. Use
/// [`MapboxClient::new`] for production or [`MapboxClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Debug)]
pub struct MapboxClient {
    client: Client,
    access_token: String,
    base_url: Url,
}

impl MapboxClient {
    /// Creates a new client pointed at the production Mapbox API.
    ///
    /// # Errors
    ///
    /// Returns [`MapboxError::MissingAccessToken`] if `access_token` is
    /// blank, or [`MapboxError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, MapboxError> {
        Self::with_base_url(access_token, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`MapboxError::MissingAccessToken`] if `access_token` is
    /// blank, [`MapboxError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`MapboxError::Api`] if `base_url` is not
    /// a valid URL.
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, MapboxError> {
        if access_token.trim().is_empty() {
            return Err(MapboxError::MissingAccessToken);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // joined endpoint paths land under the root rather than replacing the
        // last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| MapboxError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            base_url,
        })
    }

    /// First-phase category search: named candidates near `proximity`,
    /// optionally constrained to a Mapbox POI category.
    ///
    /// A response without a `suggestions` field deserializes to an empty
    /// vector; absence of candidates is not an error.
    ///
    /// # Errors
    ///
    /// - [`MapboxError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MapboxError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn suggest(
        &self,
        query: &str,
        proximity: Option<LngLat>,
        poi_category: Option<&str>,
        limit: usize,
        session: &SessionToken,
    ) -> Result<Vec<Suggestion>, MapboxError> {
        let mut url = self.endpoint("search/searchbox/v1/suggest")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if let Some(origin) = proximity {
                pairs.append_pair("proximity", &origin.as_param());
            }
            pairs.append_pair("limit", &limit.to_string());
            if let Some(category) = poi_category {
                pairs.append_pair("poi_category", category);
            }
            pairs.append_pair("access_token", &self.access_token);
            pairs.append_pair("session_token", session.as_str());
        }

        let body = self.request_json(url).await?;
        let envelope: SuggestResponse =
            serde_json::from_value(body).map_err(|e| MapboxError::Deserialize {
                context: format!("suggest(q={query})"),
                source: e,
            })?;

        Ok(envelope.suggestions)
    }

    /// Second-phase resolution of a suggest candidate into a positioned
    /// feature. Returns `None` when the provider has no matching feature.
    ///
    /// # Errors
    ///
    /// - [`MapboxError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MapboxError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn retrieve(
        &self,
        mapbox_id: &str,
        session: &SessionToken,
    ) -> Result<Option<RetrieveFeature>, MapboxError> {
        let encoded = utf8_percent_encode(mapbox_id, NON_ALPHANUMERIC).to_string();
        let mut url = self.endpoint(&format!("search/searchbox/v1/retrieve/{encoded}"))?;
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token)
            .append_pair("session_token", session.as_str());

        let body = self.request_json(url).await?;
        let envelope: RetrieveResponse =
            serde_json::from_value(body).map_err(|e| MapboxError::Deserialize {
                context: format!("retrieve(id={mapbox_id})"),
                source: e,
            })?;

        Ok(envelope.features.into_iter().next())
    }

    /// One-shot POI text search via the geocoding API: no suggest/retrieve
    /// split, coordinates included directly in each feature.
    ///
    /// # Errors
    ///
    /// - [`MapboxError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MapboxError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn geocode_search(
        &self,
        query: &str,
        proximity: Option<LngLat>,
        limit: usize,
    ) -> Result<Vec<GeocodeFeature>, MapboxError> {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
        let mut url = self.endpoint(&format!("geocoding/v5/mapbox.places/{encoded}.json"))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("types", "poi");
            pairs.append_pair("limit", &limit.to_string());
            pairs.append_pair("language", "en");
            if let Some(origin) = proximity {
                pairs.append_pair("proximity", &origin.as_param());
            }
            pairs.append_pair("access_token", &self.access_token);
        }

        let body = self.request_json(url).await?;
        let envelope: GeocodeResponse =
            serde_json::from_value(body).map_err(|e| MapboxError::Deserialize {
                context: format!("geocode_search(q={query})"),
                source: e,
            })?;

        Ok(envelope.features)
    }

    /// Fetches the primary driving route between two coordinates.
    ///
    /// # Errors
    ///
    /// - [`MapboxError::Api`] if the response `code` is not `"Ok"` or the
    ///   route list is empty.
    /// - [`MapboxError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MapboxError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn directions(
        &self,
        origin: LngLat,
        destination: LngLat,
    ) -> Result<DirectionsRoute, MapboxError> {
        let coordinates = format!("{};{}", origin.as_param(), destination.as_param());
        let mut url = self.endpoint(&format!("directions/v5/{DRIVING_PROFILE}/{coordinates}"))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("alternatives", "false");
            pairs.append_pair("geometries", "geojson");
            pairs.append_pair("overview", "full");
            pairs.append_pair("access_token", &self.access_token);
        }

        let body = self.request_json(url).await?;
        let envelope: DirectionsResponse =
            serde_json::from_value(body).map_err(|e| MapboxError::Deserialize {
                context: format!("directions({coordinates})"),
                source: e,
            })?;

        if envelope.code != "Ok" {
            let message = envelope
                .message
                .unwrap_or_else(|| format!("directions request failed with code {}", envelope.code));
            return Err(MapboxError::Api(message));
        }

        envelope
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| MapboxError::Api("directions response contained no routes".to_string()))
    }

    /// Fetches drive-time isochrone polygons around a center point.
    ///
    /// The polygon payload is passed through uninterpreted; only the
    /// error-signalling `message` field is inspected.
    ///
    /// # Errors
    ///
    /// - [`MapboxError::Api`] if the response carries a `message` field.
    /// - [`MapboxError::Http`] on network failure or non-2xx HTTP status.
    pub async fn isochrone(
        &self,
        center: LngLat,
        contours_minutes: &str,
    ) -> Result<serde_json::Value, MapboxError> {
        let mut url =
            self.endpoint(&format!("isochrone/v1/{DRIVING_PROFILE}/{}", center.as_param()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("contours_minutes", contours_minutes);
            pairs.append_pair("polygons", "true");
            pairs.append_pair("denoise", "0.5");
            pairs.append_pair("access_token", &self.access_token);
        }

        let body = self.request_json(url).await?;
        if let Some(message) = body.get("message").and_then(serde_json::Value::as_str) {
            return Err(MapboxError::Api(message.to_owned()));
        }
        Ok(body)
    }

    fn endpoint(&self, path: &str) -> Result<Url, MapboxError> {
        self.base_url
            .join(path)
            .map_err(|e| MapboxError::Api(format!("invalid endpoint path '{path}': {e}")))
    }

    async fn request_json(&self, url: Url) -> Result<serde_json::Value, MapboxError> {
        tracing::debug!(path = url.path(), "mapbox request");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json::<serde_json::Value>().await?)
    }
}
