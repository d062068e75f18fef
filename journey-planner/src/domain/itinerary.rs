//! Untimed itineraries.

use serde::Serialize;

use super::{DomainError, Leg, StopId};

/// A sequence of legs from origin to destination with its graph cost.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs connect (destination of one = origin of next)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    legs: Vec<Leg>,
    /// Journey cost in minutes: ride time plus one transfer penalty per change.
    cost: f64,
    /// Raw path cost between the origin and destination hubs.
    path_cost: f64,
}

impl Itinerary {
    /// Constructs an itinerary from connected legs.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the leg list is empty or two consecutive legs
    /// don't share a stop.
    pub fn new(legs: Vec<Leg>, cost: f64, path_cost: f64) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        for window in legs.windows(2) {
            let prev_dest = window[0].destination();
            let next_origin = window[1].origin();
            if prev_dest != next_origin {
                return Err(DomainError::LegsNotConnected(prev_dest, next_origin));
            }
        }

        Ok(Self {
            legs,
            cost,
            path_cost,
        })
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn into_legs(self) -> Vec<Leg> {
        self.legs
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn path_cost(&self) -> f64 {
        self.path_cost
    }

    /// Origin stop of the first leg.
    pub fn origin(&self) -> StopId {
        self.legs[0].origin()
    }

    /// Destination stop of the last leg.
    pub fn destination(&self) -> StopId {
        self.legs[self.legs.len() - 1].destination()
    }

    /// Number of changes between routes.
    pub fn change_count(&self) -> usize {
        self.legs.len() - 1
    }

    /// Deduplication key: the leg signatures joined by `|`.
    ///
    /// Two itineraries with the same signature ride the same base routes
    /// between the same stops, whatever pattern or intermediate stops
    /// they were found through.
    pub fn signature(&self) -> String {
        self.legs
            .iter()
            .map(Leg::signature)
            .collect::<Vec<_>>()
            .join("|")
    }
}
