//! Two-phase category search.
//!
//! Suggest candidates near an origin, filter them by keyword relevance,
//! resolve the survivors concurrently, re-validate on the detail record, and
//! return a distance-sorted, deduplicated result set. Absence of results at
//! any stage converges to an empty vector; only a phase-1 transport failure
//! is an error, and the caller decides how that degrades.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use inkscout_core::geo::{self, LngLat};
use inkscout_core::place::PlaceResult;
use inkscout_mapbox::normalize;
use inkscout_mapbox::types::Suggestion;
use inkscout_mapbox::{MapboxClient, MapboxError, SessionToken};

/// Substrings that mark a candidate as tattoo-related. Candidates matching
/// none of these are excluded regardless of provider ranking.
pub const RELEVANCE_KEYWORDS: &[&str] = &[
    "tattoo",
    "tattoo studio",
    "tattoo shop",
    "tattoo parlor",
    "tattoo parlour",
    "body art",
    "piercing",
    "ink",
    "tattoo artist",
    "tattooist",
];

/// Mapbox POI category used for the primary (narrow) suggest call.
const POI_CATEGORY: &str = "tattoo_parlour";

/// Query used when the caller supplies no text at all.
const DEFAULT_QUERY: &str = "tattoo shop";

/// Keyword appended to free-text queries that carry no tattoo signal of
/// their own, so every search stays scoped to the target category.
const DOMAIN_KEYWORD: &str = "tattoo";

/// Sentinel category for resolved places the provider left untagged.
const DEFAULT_CATEGORY: &str = "Tattoo Studio";

/// Upper bound on candidates resolved in phase 2, bounding fan-out cost.
const RETRIEVE_CAP: usize = 10;

/// Orchestrates the suggest → filter → retrieve → re-validate pipeline.
pub struct CategorySearchAggregator {
    client: Arc<MapboxClient>,
    suggest_limit: usize,
}

impl CategorySearchAggregator {
    #[must_use]
    pub fn new(client: Arc<MapboxClient>, suggest_limit: usize) -> Self {
        Self {
            client,
            suggest_limit,
        }
    }

    /// Runs the full two-phase search around `origin`.
    ///
    /// Results are deduplicated by id (first seen wins), capped at
    /// [`RETRIEVE_CAP`] before resolution, and sorted ascending by
    /// `distance_miles` with ties keeping suggestion order.
    ///
    /// # Errors
    ///
    /// Returns [`MapboxError`] only when phase 1 itself fails; individual
    /// candidate resolution failures drop that candidate and nothing else.
    pub async fn search(
        &self,
        origin: LngLat,
        query: &str,
    ) -> Result<Vec<PlaceResult>, MapboxError> {
        let term = compose_query(query);
        let session = SessionToken::new();

        let mut candidates = self
            .client
            .suggest(
                &term,
                Some(origin),
                Some(POI_CATEGORY),
                self.suggest_limit,
                &session,
            )
            .await?;

        if candidates.is_empty() {
            tracing::debug!(%term, "no categorized candidates; retrying without category filter");
            candidates = self
                .client
                .suggest(&term, Some(origin), None, self.suggest_limit, &session)
                .await?;
        }

        let mut seen = HashSet::new();
        let survivors: Vec<Suggestion> = candidates
            .into_iter()
            .filter(is_relevant_suggestion)
            .filter(|candidate| seen.insert(candidate.mapbox_id.clone()))
            .take(RETRIEVE_CAP)
            .collect();

        if survivors.is_empty() {
            return Ok(Vec::new());
        }

        let resolutions = survivors
            .iter()
            .map(|candidate| self.resolve(candidate, origin, &session));
        let mut results: Vec<PlaceResult> =
            join_all(resolutions).await.into_iter().flatten().collect();

        // Stable sort: equal distances keep the provider's suggestion order.
        results.sort_by(|a, b| {
            a.distance_miles
                .partial_cmp(&b.distance_miles)
                .unwrap_or(Ordering::Equal)
        });

        Ok(results)
    }

    /// One-shot text search through the geocoding endpoint: no
    /// suggest/retrieve split and no distance annotation.
    ///
    /// # Errors
    ///
    /// Returns [`MapboxError`] if the geocoding call fails.
    pub async fn text_search(
        &self,
        query: &str,
        proximity: Option<LngLat>,
        limit: usize,
    ) -> Result<Vec<PlaceResult>, MapboxError> {
        let term = compose_query(query);
        let features = self.client.geocode_search(&term, proximity, limit).await?;
        Ok(features
            .into_iter()
            .map(normalize::place_from_geocode)
            .collect())
    }

    /// Resolves one candidate. Any failure (transport error, missing
    /// feature, failed re-validation) yields `None` and affects no other
    /// candidate.
    async fn resolve(
        &self,
        candidate: &Suggestion,
        origin: LngLat,
        session: &SessionToken,
    ) -> Option<PlaceResult> {
        let feature = match self.client.retrieve(&candidate.mapbox_id, session).await {
            Ok(Some(feature)) => feature,
            Ok(None) => {
                tracing::debug!(candidate = %candidate.mapbox_id, "retrieve returned no feature");
                return None;
            }
            Err(err) => {
                tracing::warn!(
                    candidate = %candidate.mapbox_id,
                    error = %err,
                    "retrieve failed; dropping candidate"
                );
                return None;
            }
        };

        let mut place = normalize::place_from_retrieve(&feature, candidate);

        // The detail record may reveal categories the suggestion lacked, so
        // relevance is re-checked on name + category tags.
        if !is_relevant_place(&place) {
            tracing::debug!(candidate = %candidate.mapbox_id, "resolved record failed relevance check");
            return None;
        }

        if place.categories.is_empty() {
            place.categories = vec![DEFAULT_CATEGORY.to_string()];
        }
        place.distance_miles = Some(round_to_tenth(geo::haversine_miles(
            origin,
            place.coordinates,
        )));

        Some(place)
    }
}

/// Composes the effective search term: verbatim when the query already
/// carries a tattoo signal, otherwise suffixed with the domain keyword.
fn compose_query(query: &str) -> String {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return DEFAULT_QUERY.to_string();
    }
    let lowered = trimmed.to_lowercase();
    if RELEVANCE_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        trimmed.to_string()
    } else {
        format!("{trimmed} {DOMAIN_KEYWORD}")
    }
}

fn contains_keyword(haystack: &str) -> bool {
    let lowered = haystack.to_lowercase();
    RELEVANCE_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

fn is_relevant_suggestion(candidate: &Suggestion) -> bool {
    let address = candidate.address.as_deref().unwrap_or_default();
    contains_keyword(&format!(
        "{} {} {}",
        candidate.name, candidate.place_formatted, address
    ))
}

fn is_relevant_place(place: &PlaceResult) -> bool {
    contains_keyword(&format!("{} {}", place.name, place.categories.join(" ")))
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
