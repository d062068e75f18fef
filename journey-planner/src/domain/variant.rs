//! Timed legs and itinerary variants.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{DomainError, Leg};

/// Which data source supplied a leg's timing.
///
/// Ordered from most to least trustworthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// An actual departure from the live source.
    Realtime,
    /// Evenly spaced departures synthesized from the requested time.
    SyntheticHeadway,
    /// Estimated from the graph's ride cost.
    GraphFallback,
}

impl Tier {
    /// True for any tier other than [`Tier::Realtime`].
    pub fn is_estimated(self) -> bool {
        self != Tier::Realtime
    }
}

/// A leg with its departure and arrival populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedLeg {
    #[serde(flatten)]
    pub leg: Leg,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub tier: Tier,
    /// Opaque run reference of the live service, if known.
    pub run_ref: Option<String>,
    /// True if `arrival` came from a duration estimate rather than the run pattern.
    pub arrival_estimated: bool,
    /// Minutes from the requested time to this departure (first leg only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_minutes: Option<i64>,
    /// Minutes from the requested time to the final arrival (first leg only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_minutes: Option<i64>,
}

/// A time-stamped instantiation of an itinerary for one first departure.
///
/// # Invariants
///
/// - At least one leg
/// - Every leg has a departure and an arrival
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryVariant {
    legs: Vec<TimedLeg>,
}

impl ItineraryVariant {
    /// # Errors
    ///
    /// Returns `Err` if `legs` is empty.
    pub fn new(legs: Vec<TimedLeg>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyVariant);
        }
        Ok(Self { legs })
    }

    pub fn legs(&self) -> &[TimedLeg] {
        &self.legs
    }

    pub fn legs_mut(&mut self) -> &mut [TimedLeg] {
        &mut self.legs
    }

    /// Departure of the first leg.
    pub fn departure(&self) -> DateTime<Utc> {
        self.legs[0].departure
    }

    /// Arrival of the last leg.
    pub fn arrival(&self) -> DateTime<Utc> {
        self.legs[self.legs.len() - 1].arrival
    }

    /// Least trustworthy tier used by any leg.
    pub fn worst_tier(&self) -> Tier {
        self.legs
            .iter()
            .map(|l| l.tier)
            .max()
            .unwrap_or(Tier::Realtime)
    }

    /// Deduplication key of the underlying itinerary.
    pub fn signature(&self) -> String {
        self.legs
            .iter()
            .map(|l| l.leg.signature())
            .collect::<Vec<_>>()
            .join("|")
    }
}
