//! Journey search over the network graph.
//!
//! Runs a k-shortest-paths query between the origin and destination hubs,
//! cuts each path into legs, drops itineraries that break the boarding
//! rules, deduplicates and returns the best few.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::{GeoPoint, Itinerary, Leg, RouteId, StopId};
use crate::graph::{GraphError, GraphPath, NetworkStore, NodeKey, RouteFilter};

use super::config::SearchConfig;
use super::rank::deduplicate;
use super::rules::BoardingRules;

/// Error from journey search.
///
/// Finding nothing is not an error; see [`SearchResult::is_empty`].
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The network store failed or returned inconsistent data
    #[error("network graph unavailable: {0}")]
    Graph(#[from] GraphError),
}

/// Request for journey search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub origin: StopId,
    pub destination: StopId,
    /// Number of itineraries wanted.
    pub k: usize,
    /// Leave replacement services out of the graph.
    pub exclude_replacement: bool,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(origin: StopId, destination: StopId, k: usize) -> Self {
        Self {
            origin,
            destination,
            k,
            exclude_replacement: false,
        }
    }

    pub fn excluding_replacements(mut self) -> Self {
        self.exclude_replacement = true;
        self
    }

    fn filter(&self) -> RouteFilter {
        if self.exclude_replacement {
            RouteFilter::without_replacements()
        } else {
            RouteFilter::none()
        }
    }
}

/// Result of journey search.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Distinct itineraries, cheapest first.
    pub itineraries: Vec<Itinerary>,

    /// Every leg of every itinerary, in order.
    pub legs: Vec<Leg>,

    /// Number of raw paths returned by the store.
    pub candidates_examined: usize,
}

impl SearchResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_itineraries(itineraries: Vec<Itinerary>, candidates_examined: usize) -> Self {
        let legs = itineraries
            .iter()
            .flat_map(|it| it.legs().iter().cloned())
            .collect();
        Self {
            itineraries,
            legs,
            candidates_examined,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.itineraries.is_empty()
    }
}

/// Journey search engine.
pub struct JourneySearch<S: ?Sized> {
    store: Arc<S>,
    config: SearchConfig,
    rules: BoardingRules,
}

impl<S: ?Sized> Clone for JourneySearch<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
            rules: self.rules.clone(),
        }
    }
}

impl<S: NetworkStore + ?Sized> JourneySearch<S> {
    /// Create a new search over `store`.
    pub fn new(store: Arc<S>, config: SearchConfig, rules: BoardingRules) -> Self {
        Self {
            store,
            config,
            rules,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find up to `min(k, max_itineraries)` distinct itineraries.
    ///
    /// Returns an empty result when origin and destination coincide,
    /// either stop is unknown, or no path connects them.
    ///
    /// # Errors
    ///
    /// Only if the network store fails.
    #[instrument(skip_all, fields(origin = %request.origin, destination = %request.destination, k = request.k))]
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        if request.origin == request.destination {
            debug!("origin equals destination");
            return Ok(SearchResult::empty());
        }
        if self.store.stop(request.origin).is_none() || self.store.stop(request.destination).is_none() {
            debug!("unknown origin or destination stop");
            return Ok(SearchResult::empty());
        }
        let limit = self.config.result_limit(request.k);
        if limit == 0 {
            return Ok(SearchResult::empty());
        }

        let paths = self.store.k_shortest_paths(
            NodeKey::hub(request.origin),
            NodeKey::hub(request.destination),
            self.config.candidate_count(request.k),
            &request.filter(),
        )?;
        let examined = paths.len();

        let mut itineraries = Vec::with_capacity(paths.len());
        for path in &paths {
            let Some(itinerary) = self.to_itinerary(path)? else {
                continue;
            };
            if let Some(violation) = self.rules.violation(&itinerary, self.store.as_ref()) {
                debug!(
                    route = %violation.route,
                    stop = %violation.stop,
                    stop_name = %violation.stop_name,
                    "rejecting itinerary: restricted route stops at blocked station"
                );
                continue;
            }
            itineraries.push(itinerary);
        }

        let mut itineraries = deduplicate(itineraries);
        itineraries.truncate(limit);
        debug!(
            candidates = examined,
            returned = itineraries.len(),
            "journey search complete"
        );

        Ok(SearchResult::from_itineraries(itineraries, examined))
    }

    /// Cut a hub-to-hub path into legs.
    ///
    /// `Ok(None)` if the path doesn't yield a valid itinerary.
    fn to_itinerary(&self, path: &GraphPath) -> Result<Option<Itinerary>, SearchError> {
        let mut runs: Vec<Run> = Vec::new();
        for (i, node) in path.nodes.iter().enumerate() {
            let Some(route) = node.route else {
                continue;
            };
            match runs.last_mut() {
                Some(run) if run.route == route && path.nodes[i - 1].route == Some(route) => {
                    run.ride_minutes += path.edge_costs[i - 1];
                    run.stops.push(node.stop);
                }
                _ => runs.push(Run {
                    route,
                    stops: vec![node.stop],
                    ride_minutes: 0.0,
                }),
            }
        }

        let mut legs = Vec::with_capacity(runs.len());
        for run in runs {
            let route = self.store.route(run.route).ok_or_else(|| {
                GraphError::Unavailable(format!("path references unknown route {}", run.route))
            })?;
            let geometry = self.leg_geometry(&run);
            match Leg::new(route.summary(), run.stops, geometry, run.ride_minutes) {
                Ok(leg) => legs.push(leg),
                Err(e) => {
                    debug!(route = %run.route, error = %e, "skipping degenerate run");
                }
            }
        }

        let cost = (path.total - self.store.transfer_penalty()).max(0.0);
        match Itinerary::new(legs, cost, path.total) {
            Ok(itinerary) => Ok(Some(itinerary)),
            Err(e) => {
                debug!(error = %e, "discarding candidate path");
                Ok(None)
            }
        }
    }

    fn leg_geometry(&self, run: &Run) -> Vec<GeoPoint> {
        let (Some(&first), Some(&last)) = (run.stops.first(), run.stops.last()) else {
            return Vec::new();
        };
        let shape = self.store.segment_geometry(run.route, first, last);
        if !shape.is_empty() {
            return shape;
        }
        run.stops
            .iter()
            .filter_map(|&s| self.store.stop(s).map(|stop| stop.location))
            .collect()
    }
}

/// Consecutive path nodes on one route.
struct Run {
    route: RouteId,
    stops: Vec<StopId>,
    ride_minutes: f64,
}
