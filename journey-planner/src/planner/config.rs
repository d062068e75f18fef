//! Search configuration for the journey planner.

/// Configuration parameters for journey search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of itineraries requested when the caller doesn't say.
    pub default_k: usize,

    /// Hard cap on itineraries returned, whatever `k` is requested.
    pub max_itineraries: usize,

    /// Minimum number of raw candidate paths fetched from the store.
    pub min_candidates: usize,

    /// Raw candidates fetched per requested itinerary.
    /// Extra candidates absorb losses to the boarding rules and dedup.
    pub candidate_multiplier: usize,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        default_k: usize,
        max_itineraries: usize,
        min_candidates: usize,
        candidate_multiplier: usize,
    ) -> Self {
        Self {
            default_k,
            max_itineraries,
            min_candidates,
            candidate_multiplier,
        }
    }

    /// Number of raw paths to request for `k` itineraries.
    pub fn candidate_count(&self, k: usize) -> usize {
        k.saturating_mul(self.candidate_multiplier)
            .max(self.min_candidates)
    }

    /// Number of itineraries actually returned for a request of `k`.
    pub fn result_limit(&self, k: usize) -> usize {
        k.min(self.max_itineraries)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: 3,
            max_itineraries: 3,
            min_candidates: 6,
            candidate_multiplier: 2,
        }
    }
}
