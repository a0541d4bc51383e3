//! Session-scoped state coordination.
//!
//! [`SessionStore`] is the single writer for all search/route/selection
//! state. Presentation code reads snapshots (or subscribes to the watch
//! channel) and calls the declared operations; it never mutates state
//! directly, and no operation ever propagates an error across this
//! boundary; failures degrade to logged state changes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use inkscout_core::geo::LngLat;
use inkscout_core::place::{PlaceResult, RouteResult};
use inkscout_mapbox::MapboxClient;

use crate::aggregator::CategorySearchAggregator;
use crate::route::RouteFetcher;

/// One observable view of the session.
///
/// `selected` is always an element of `results` (by id) or `None`, and
/// `route.is_some()` implies `selected.is_some()`.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub origin: Option<LngLat>,
    pub destination: Option<LngLat>,
    pub results: Vec<PlaceResult>,
    pub selected: Option<PlaceResult>,
    pub route: Option<RouteResult>,
    pub is_loading: bool,
    pub is_loading_route: bool,
    /// True once the first search attempt has completed, success or failure.
    /// Gates "no results" messaging so it never shows before any search ran.
    pub is_initialized: bool,
}

/// Owned state container coordinating search and routing.
///
/// Concurrent `fetch_results` calls are serialized through a request
/// generation counter: each call takes a fresh generation at entry, and a
/// completed search may only write its outcome while its generation is
/// still the latest issued. Superseded responses are dropped at the write
/// site; in-flight requests are never cancelled.
pub struct SessionStore {
    aggregator: CategorySearchAggregator,
    routes: RouteFetcher,
    state: Mutex<SessionSnapshot>,
    generation: AtomicU64,
    observers: watch::Sender<SessionSnapshot>,
}

impl SessionStore {
    #[must_use]
    pub fn new(client: Arc<MapboxClient>, suggest_limit: usize) -> Self {
        let (observers, _) = watch::channel(SessionSnapshot::default());
        Self {
            aggregator: CategorySearchAggregator::new(Arc::clone(&client), suggest_limit),
            routes: RouteFetcher::new(client),
            state: Mutex::new(SessionSnapshot::default()),
            generation: AtomicU64::new(0),
            observers,
        }
    }

    /// Returns a clone of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().expect("session state poisoned").clone()
    }

    /// Subscribes to state changes. Every mutation publishes a fresh
    /// snapshot to all receivers.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.observers.subscribe()
    }

    pub fn set_origin(&self, origin: Option<LngLat>) {
        self.mutate(|state| state.origin = origin);
    }

    pub fn set_destination(&self, destination: Option<LngLat>) {
        self.mutate(|state| state.destination = destination);
    }

    /// Runs a category search around `(lat, lng)` and stores the outcome.
    ///
    /// A search failure degrades to an empty result set; either way the
    /// session ends up initialized with loading cleared. If a newer search
    /// was issued while this one was in flight, the stale outcome is
    /// discarded wholesale.
    pub async fn fetch_results(&self, lat: f64, lng: f64, query: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let origin = LngLat::new(lng, lat);

        // Guarded so a search superseded before it even starts cannot leave
        // the loading flag set after the newer search already cleared it.
        if !self.mutate_if_current(generation, |state| state.is_loading = true) {
            tracing::debug!(generation, "search superseded before starting");
            return;
        }

        let outcome = self.aggregator.search(origin, query).await;

        let applied = self.mutate_if_current(generation, |state| {
            let results = match outcome {
                Ok(results) => results,
                Err(err) => {
                    tracing::error!(error = %err, "category search failed; degrading to empty result set");
                    Vec::new()
                }
            };

            // A surviving selection must still be a member of the new set.
            let selection_survives = state
                .selected
                .as_ref()
                .is_some_and(|sel| results.iter().any(|r| r.id == sel.id));
            if !selection_survives && state.selected.is_some() {
                state.selected = None;
                state.route = None;
                state.destination = None;
            }

            state.results = results;
            state.origin = Some(origin);
            state.is_loading = false;
            state.is_initialized = true;
        });

        if !applied {
            tracing::debug!(generation, "discarding superseded search response");
        }
    }

    /// Toggles the selection: selecting the currently selected result
    /// clears it, selecting a different one replaces it. A result whose id
    /// is not in the current result set is ignored. Any selection change
    /// drops an active route, since the route was computed for the
    /// previous selection.
    pub fn select_result(&self, result: Option<PlaceResult>) {
        self.mutate(|state| {
            let next = match result {
                None => None,
                Some(candidate) => {
                    if !state.results.iter().any(|r| r.id == candidate.id) {
                        tracing::debug!(
                            id = %candidate.id,
                            "selection ignored: result not in current set"
                        );
                        return;
                    }
                    let is_toggle_off = state
                        .selected
                        .as_ref()
                        .is_some_and(|current| current.id == candidate.id);
                    if is_toggle_off {
                        None
                    } else {
                        Some(candidate)
                    }
                }
            };

            let unchanged = match (&state.selected, &next) {
                (None, None) => true,
                (Some(a), Some(b)) => a.id == b.id,
                _ => false,
            };
            if unchanged {
                return;
            }

            state.route = None;
            state.destination = None;
            state.selected = next;
        });
    }

    /// Fetches a driving route and stores it.
    ///
    /// Guarded: a route only makes sense while both an origin and a
    /// selected result exist; otherwise the call is a logged no-op. On
    /// failure the route stays unset and the selection is untouched.
    pub async fn fetch_route(&self, origin: LngLat, destination: LngLat) {
        {
            let state = self.state.lock().expect("session state poisoned");
            if state.selected.is_none() || state.origin.is_none() {
                tracing::debug!("route request ignored: needs both an origin and a selection");
                return;
            }
        }

        self.mutate(|state| state.is_loading_route = true);

        let outcome = self.routes.fetch(origin, destination).await;

        self.mutate(|state| {
            match outcome {
                Ok(route) => {
                    state.route = Some(route);
                    state.origin = Some(origin);
                    state.destination = Some(destination);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "route fetch failed; leaving route unset");
                    state.route = None;
                }
            }
            state.is_loading_route = false;
        });
    }

    /// Clears the route together with its coupled state: destination and
    /// selection always reset with it.
    pub fn clear_route(&self) {
        self.mutate(|state| {
            state.route = None;
            state.destination = None;
            state.selected = None;
        });
    }

    fn mutate(&self, apply: impl FnOnce(&mut SessionSnapshot)) {
        let mut state = self.state.lock().expect("session state poisoned");
        apply(&mut state);
        self.observers.send_replace(state.clone());
    }

    /// Applies a mutation only if `generation` is still the latest issued.
    /// The check happens under the state lock so a newer writer cannot be
    /// overtaken between check and write.
    fn mutate_if_current(
        &self,
        generation: u64,
        apply: impl FnOnce(&mut SessionSnapshot),
    ) -> bool {
        let mut state = self.state.lock().expect("session state poisoned");
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        apply(&mut state);
        self.observers.send_replace(state.clone());
        true
    }
}
