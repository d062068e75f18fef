//! Per-leg time propagation.
//!
//! A variant is built as a fold over its legs: each step takes the bound
//! left by the previous leg and returns the timed leg plus the bound for
//! the next one. Steps run strictly in order.

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use super::EnrichConfig;
use super::fallback::{Departure, estimated_duration, live_departure, pattern_arrival};
use crate::domain::{DomainError, Itinerary, ItineraryVariant, Leg, TimedLeg};
use crate::live::LiveSource;

/// What constrains a leg's departure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegBound {
    /// The first leg departs at its seed.
    Seed(Departure),
    /// Later legs depart after this time.
    After(DateTime<Utc>),
}

/// Time one leg and return the bound for the next.
pub async fn time_leg<S: LiveSource + ?Sized>(
    source: &S,
    leg: &Leg,
    bound: LegBound,
    config: &EnrichConfig,
) -> (TimedLeg, LegBound) {
    let departure = match bound {
        LegBound::Seed(departure) => departure,
        LegBound::After(earliest) => match live_departure(source, leg, earliest, config).await {
            Ok(departure) => departure,
            Err(reason) => {
                debug!(stop = %leg.origin(), route = %leg.route().id, %reason, "leg degraded to graph estimate");
                Departure::graph_fallback(earliest + config.fallback_pad())
            }
        },
    };

    let (arrival, arrival_estimated) = match pattern_arrival(source, leg, &departure).await {
        Ok(arrival) => (arrival, false),
        Err(reason) => {
            trace!(stop = %leg.destination(), %reason, "arrival estimated from ride cost");
            (departure.time + estimated_duration(leg, config), true)
        }
    };

    let timed = TimedLeg {
        leg: leg.clone(),
        departure: departure.time,
        arrival,
        tier: departure.tier,
        run_ref: departure.run_ref,
        arrival_estimated,
        wait_minutes: None,
        total_minutes: None,
    };
    let next = LegBound::After(arrival + config.transfer_buffer());
    (timed, next)
}

/// Build the variant of `itinerary` that departs on `seed`.
pub async fn propagate<S: LiveSource + ?Sized>(
    source: &S,
    itinerary: &Itinerary,
    seed: Departure,
    config: &EnrichConfig,
) -> Result<ItineraryVariant, DomainError> {
    let mut legs = Vec::with_capacity(itinerary.legs().len());
    let mut bound = LegBound::Seed(seed);
    for leg in itinerary.legs() {
        let (timed, next) = time_leg(source, leg, bound, config).await;
        legs.push(timed);
        bound = next;
    }
    ItineraryVariant::new(legs)
}
