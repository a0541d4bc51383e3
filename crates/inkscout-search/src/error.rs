use thiserror::Error;

use inkscout_mapbox::MapboxError;

/// Errors raised by the route-fetching flow.
///
/// Unlike background search, which degrades to an empty result set, a
/// route is a discrete user action with a visible failure state, so provider
/// failures propagate to the caller.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route request failed: {0}")]
    Provider(#[from] MapboxError),
}
