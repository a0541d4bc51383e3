//! Single-route fetching against the directions endpoint.

use std::sync::Arc;

use inkscout_core::geo::LngLat;
use inkscout_core::place::RouteResult;
use inkscout_mapbox::MapboxClient;

use crate::error::RouteError;

/// Fetches one driving route between two coordinates.
pub struct RouteFetcher {
    client: Arc<MapboxClient>,
}

impl RouteFetcher {
    #[must_use]
    pub fn new(client: Arc<MapboxClient>) -> Self {
        Self { client }
    }

    /// Requests the primary route from `origin` to `destination`.
    ///
    /// Identical endpoints short-circuit to a zero-length route without a
    /// network call: a route to where you already stand is a degenerate
    /// success, not a failure.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Provider`] when the provider rejects the
    /// request (non-`"Ok"` code, no routes) or the transport fails.
    pub async fn fetch(
        &self,
        origin: LngLat,
        destination: LngLat,
    ) -> Result<RouteResult, RouteError> {
        if origin == destination {
            tracing::debug!("identical route endpoints; returning zero-length route");
            return Ok(RouteResult {
                geometry: vec![origin],
                distance_meters: 0.0,
                duration_seconds: 0.0,
                legs: Vec::new(),
            });
        }

        let route = self.client.directions(origin, destination).await?;
        Ok(RouteResult {
            geometry: route.geometry.coordinates,
            distance_meters: route.distance,
            duration_seconds: route.duration,
            legs: route.legs,
        })
    }
}
