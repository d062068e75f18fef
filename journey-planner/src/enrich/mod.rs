//! Real-time enrichment.
//!
//! Static itineraries come in; timed variants come out, ranked by arrival.
//! Each leg is timed from the best tier available:
//!
//! 1. **Realtime**: a live departure on the leg's route
//! 2. **SyntheticHeadway**: evenly spaced first departures when the live
//!    source has none
//! 3. **GraphFallback**: for later legs, the earliest allowed time plus a
//!    pad, with the ride cost as duration
//!
//! Live failures never escape this module.

mod config;
mod enricher;
mod fallback;
mod propagate;
mod seed;
#[cfg(test)]
mod test_support;

pub use config::EnrichConfig;
pub use enricher::{EnrichRequest, Enricher, annotate, rank};
pub use fallback::{
    Degraded, Departure, estimated_duration, live_departure, pattern_arrival, route_board,
};
pub use propagate::{LegBound, propagate, time_leg};
pub use seed::{first_departures, synthetic_departures};
