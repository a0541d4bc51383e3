use thiserror::Error;

/// Errors returned by the Mapbox API client.
#[derive(Debug, Error)]
pub enum MapboxError {
    /// The access token was empty or absent at client construction.
    #[error("Mapbox access token is not configured")]
    MissingAccessToken,

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered but reported a failure (e.g. a directions response
    /// whose `code` is not `"Ok"`).
    #[error("Mapbox API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
