//! Typed HTTP client for the Mapbox search, geocoding, and navigation APIs.
//!
//! Each operation is a single request/response mapping with no retry logic:
//! the caller decides whether a failure degrades or propagates. All calls
//! require an access token; an absent token is rejected at construction,
//! before any network traffic.

pub mod client;
pub mod error;
pub mod normalize;
pub mod session;
pub mod types;

pub use client::MapboxClient;
pub use error::MapboxError;
pub use session::SessionToken;
pub use types::{
    DirectionsRoute, GeocodeFeature, RetrieveFeature, Suggestion,
};
