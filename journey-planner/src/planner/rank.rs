//! Deduplication of candidate itineraries.

use std::collections::HashSet;

use tracing::trace;

use crate::domain::Itinerary;

/// Keep the first itinerary per signature, preserving order.
///
/// Candidates arrive cheapest first, so the survivor of each signature is
/// the cheapest way found to ride that sequence of base routes.
pub fn deduplicate(itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    let mut seen = HashSet::new();
    itineraries
        .into_iter()
        .filter(|it| {
            let signature = it.signature();
            let fresh = seen.insert(signature.clone());
            if !fresh {
                trace!(%signature, cost = it.cost(), "dropping duplicate itinerary");
            }
            fresh
        })
        .collect()
}
