//! Planning entry point.
//!
//! [`TripPlanner::plan`] runs the journey search on the blocking pool, then
//! enriches the itineraries it found with live times. Finding no itinerary
//! is a normal, empty response.

use chrono::{DateTime, Utc};
use futures::future::{AbortRegistration, Abortable};
use serde::Serialize;
use tracing::{Instrument, Span, debug, info, info_span};

use crate::domain::{Itinerary, ItineraryVariant, Leg, StopId};
use crate::enrich::{EnrichRequest, Enricher};
use crate::graph::{GraphError, NetworkStore};
use crate::live::LiveSource;
use crate::planner::{JourneySearch, SearchError, SearchRequest};

/// Error that aborts a planning request.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The network graph could not be queried
    #[error("network graph unavailable: {0}")]
    GraphUnavailable(#[from] GraphError),

    /// The request was cancelled by its caller
    #[error("planning request cancelled")]
    Cancelled,

    /// The search task failed unexpectedly
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<SearchError> for PlanError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Graph(e) => PlanError::GraphUnavailable(e),
        }
    }
}

/// A planning request. Unset fields take the planner's defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub origin: StopId,
    pub destination: StopId,
    pub k: Option<usize>,
    /// Defaults to now.
    pub depart_at: Option<DateTime<Utc>>,
    /// First departures tried per itinerary.
    pub departures_per_leg: Option<usize>,
    pub exclude_replacement: bool,
}

impl PlanRequest {
    pub fn new(origin: StopId, destination: StopId) -> Self {
        Self {
            origin,
            destination,
            k: None,
            depart_at: None,
            departures_per_leg: None,
            exclude_replacement: false,
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    pub fn departing_at(mut self, time: DateTime<Utc>) -> Self {
        self.depart_at = Some(time);
        self
    }

    pub fn with_departures_per_leg(mut self, count: usize) -> Self {
        self.departures_per_leg = Some(count);
        self
    }

    pub fn excluding_replacements(mut self) -> Self {
        self.exclude_replacement = true;
        self
    }
}

/// A planning response.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub requested_at: DateTime<Utc>,
    /// Timed variants, earliest arrival first.
    pub variants: Vec<ItineraryVariant>,
    /// The static itineraries the variants were built from, cheapest first.
    pub itineraries: Vec<Itinerary>,
    /// Every leg of every itinerary, in order.
    pub legs: Vec<Leg>,
}

impl PlanResponse {
    pub fn is_empty(&self) -> bool {
        self.itineraries.is_empty()
    }
}

/// Journey search plus enrichment.
pub struct TripPlanner<N: ?Sized, L: ?Sized> {
    search: JourneySearch<N>,
    enricher: Enricher<L>,
}

impl<N: ?Sized, L: ?Sized> Clone for TripPlanner<N, L> {
    fn clone(&self) -> Self {
        Self {
            search: self.search.clone(),
            enricher: self.enricher.clone(),
        }
    }
}

impl<N, L> TripPlanner<N, L>
where
    N: NetworkStore + ?Sized + 'static,
    L: LiveSource + ?Sized,
{
    pub fn new(search: JourneySearch<N>, enricher: Enricher<L>) -> Self {
        Self { search, enricher }
    }

    pub fn search(&self) -> &JourneySearch<N> {
        &self.search
    }

    pub fn enricher(&self) -> &Enricher<L> {
        &self.enricher
    }

    /// Plan a journey.
    ///
    /// # Errors
    ///
    /// Only if the network graph is unavailable or the search task dies.
    /// Live source failures degrade timing instead.
    pub async fn plan(&self, request: PlanRequest) -> Result<PlanResponse, PlanError> {
        let k = request.k.unwrap_or(self.search.config().default_k);
        let span = info_span!(
            "plan",
            origin = %request.origin,
            destination = %request.destination,
            k
        );
        self.plan_inner(request, k).instrument(span).await
    }

    /// Plan a journey that can be cancelled through `registration`.
    ///
    /// Aborting abandons any in-flight live calls; the shared limiter and
    /// cache are left consistent.
    pub async fn plan_abortable(
        &self,
        request: PlanRequest,
        registration: AbortRegistration,
    ) -> Result<PlanResponse, PlanError> {
        match Abortable::new(self.plan(request), registration).await {
            Ok(result) => result,
            Err(_aborted) => {
                debug!("planning request aborted");
                Err(PlanError::Cancelled)
            }
        }
    }

    async fn plan_inner(&self, request: PlanRequest, k: usize) -> Result<PlanResponse, PlanError> {
        let requested_at = request.depart_at.unwrap_or_else(Utc::now);
        let lookahead = request
            .departures_per_leg
            .unwrap_or(self.enricher.config().lookahead);

        let mut search_request = SearchRequest::new(request.origin, request.destination, k);
        search_request.exclude_replacement = request.exclude_replacement;

        let search = self.search.clone();
        let span = Span::current();
        let found = tokio::task::spawn_blocking(move || {
            span.in_scope(|| search.search(&search_request))
        })
        .await
        .map_err(|e| PlanError::Internal(format!("search task failed: {e}")))??;

        if found.is_empty() {
            info!("no itinerary found");
            return Ok(PlanResponse {
                requested_at,
                variants: Vec::new(),
                itineraries: Vec::new(),
                legs: Vec::new(),
            });
        }

        let enrich_request = EnrichRequest {
            requested: requested_at,
            k,
            lookahead,
        };
        let variants = self
            .enricher
            .enrich(&found.itineraries, &enrich_request)
            .await;

        info!(
            itineraries = found.itineraries.len(),
            variants = variants.len(),
            "plan complete"
        );

        Ok(PlanResponse {
            requested_at,
            variants,
            itineraries: found.itineraries,
            legs: found.legs,
        })
    }
}
