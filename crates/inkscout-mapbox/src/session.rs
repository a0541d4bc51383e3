//! Search session tokens.

use uuid::Uuid;

/// Opaque token correlating a suggest call with its retrieve call(s).
///
/// Mapbox billing and relevance semantics assume one token per logical
/// search session, so the aggregator mints one token and reuses it across
/// the whole suggest→retrieve pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps a caller-supplied token value. Useful in tests where the token
    /// must be predictable enough to match against.
    #[must_use]
    pub fn from_raw(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
