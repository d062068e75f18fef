//! Real-time enrichment of static itineraries.
//!
//! Work runs in two rounds through a bounded pool: first-departure seeding
//! per itinerary, then propagation per (itinerary, seed). Within a variant
//! legs are timed in order; variants are independent of each other.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, instrument, warn};

use super::EnrichConfig;
use super::propagate::propagate;
use super::seed::first_departures;
use crate::domain::{Itinerary, ItineraryVariant};
use crate::live::LiveSource;

/// Request for enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichRequest {
    /// Departure time the variants are anchored to.
    pub requested: DateTime<Utc>,
    /// Itineraries the caller asked for.
    pub k: usize,
    /// First departures tried per itinerary.
    pub lookahead: usize,
}

/// Turns itineraries into timed variants using a [`LiveSource`].
pub struct Enricher<S: ?Sized> {
    source: Arc<S>,
    config: EnrichConfig,
}

impl<S: ?Sized> Clone for Enricher<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            config: self.config.clone(),
        }
    }
}

impl<S: LiveSource + ?Sized> Enricher<S> {
    pub fn new(source: Arc<S>, config: EnrichConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &EnrichConfig {
        &self.config
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Timed variants of `itineraries`, earliest arrival first.
    ///
    /// Never fails: live errors only lower the tier of the legs they touch.
    #[instrument(skip_all, fields(itineraries = itineraries.len(), lookahead = request.lookahead))]
    pub async fn enrich(
        &self,
        itineraries: &[Itinerary],
        request: &EnrichRequest,
    ) -> Vec<ItineraryVariant> {
        let workers = self.config.workers.max(1);
        let source = &*self.source;
        let config = &self.config;

        let seeded: Vec<(usize, Vec<_>)> = stream::iter(itineraries.iter().enumerate())
            .map(|(index, itinerary)| async move {
                let seeds = first_departures(
                    source,
                    &itinerary.legs()[0],
                    request.requested,
                    request.lookahead,
                    config,
                )
                .await;
                (index, seeds)
            })
            .buffer_unordered(workers)
            .collect()
            .await;

        let work: Vec<_> = seeded
            .into_iter()
            .flat_map(|(index, seeds)| seeds.into_iter().map(move |seed| (index, seed)))
            .collect();
        debug!(work_items = work.len(), "propagating variants");

        let variants: Vec<ItineraryVariant> = stream::iter(work)
            .map(|(index, seed)| propagate(source, &itineraries[index], seed, config))
            .buffer_unordered(workers)
            .filter_map(|built| async move {
                built
                    .inspect_err(|e| warn!(error = %e, "dropping malformed variant"))
                    .ok()
            })
            .collect()
            .await;

        let limit = self.config.result_limit(request.k, request.lookahead);
        let mut ranked = rank(variants, limit);
        annotate(&mut ranked, request.requested);
        ranked
    }
}

/// Sort by final arrival and keep the best `limit`.
///
/// Ties go to the earlier departure, then to the itinerary signature, so
/// the order doesn't depend on which worker finished first.
pub fn rank(mut variants: Vec<ItineraryVariant>, limit: usize) -> Vec<ItineraryVariant> {
    variants.sort_by(|a, b| {
        a.arrival()
            .cmp(&b.arrival())
            .then_with(|| a.departure().cmp(&b.departure()))
            .then_with(|| a.signature().cmp(&b.signature()))
    });
    variants.truncate(limit);
    variants
}

/// Set wait and total minutes on the first leg of each variant.
pub fn annotate(variants: &mut [ItineraryVariant], requested: DateTime<Utc>) {
    for variant in variants {
        let total = (variant.arrival() - requested).num_minutes().max(0);
        let first = &mut variant.legs_mut()[0];
        first.wait_minutes = Some((first.departure - requested).num_minutes().max(0));
        first.total_minutes = Some(total);
    }
}
