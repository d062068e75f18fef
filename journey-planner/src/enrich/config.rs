//! Enrichment configuration.

use chrono::TimeDelta;

/// Configuration parameters for real-time enrichment.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// Minimum gap between arriving on one leg and departing on the next.
    pub transfer_buffer_mins: i64,

    /// Spacing of synthesized first departures.
    pub synthetic_headway_mins: i64,

    /// Added to the earliest allowed time when a later leg has no live departure.
    pub fallback_pad_mins: i64,

    /// Ride duration used when the graph cost is zero.
    pub default_leg_mins: i64,

    /// First departures tried per itinerary when the caller doesn't say.
    pub lookahead: usize,

    /// Itineraries' worth of variants returned, whatever `k` is requested.
    pub max_itineraries: usize,

    /// Rows requested per departure board.
    pub board_size: usize,

    /// Work items in flight at once.
    pub workers: usize,
}

impl EnrichConfig {
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn transfer_buffer(&self) -> TimeDelta {
        TimeDelta::minutes(self.transfer_buffer_mins)
    }

    pub fn synthetic_headway(&self) -> TimeDelta {
        TimeDelta::minutes(self.synthetic_headway_mins)
    }

    pub fn fallback_pad(&self) -> TimeDelta {
        TimeDelta::minutes(self.fallback_pad_mins)
    }

    pub fn default_leg(&self) -> TimeDelta {
        TimeDelta::minutes(self.default_leg_mins)
    }

    /// Number of variants returned for `k` itineraries with `lookahead` departures each.
    pub fn result_limit(&self, k: usize, lookahead: usize) -> usize {
        k.min(self.max_itineraries).saturating_mul(lookahead)
    }
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            transfer_buffer_mins: 3,
            synthetic_headway_mins: 12,
            fallback_pad_mins: 5,
            default_leg_mins: 10,
            lookahead: 4,
            max_itineraries: 3,
            board_size: 50,
            workers: 4,
        }
    }
}
