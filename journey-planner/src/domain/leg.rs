//! Untimed legs.
//!
//! A `Leg` is a maximal run of consecutive stops travelled on one route.
//! Legs come out of the journey search with graph costs only; live times
//! are attached later as [`TimedLeg`](super::TimedLeg)s.

use serde::Serialize;

use super::{DomainError, GeoPoint, RouteSummary, StopId};

/// A ride on one route between two stops.
///
/// # Invariants
///
/// - `origin != destination`
/// - `stops` starts at `origin` and ends at `destination`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    origin: StopId,
    destination: StopId,
    route: RouteSummary,
    /// Every stop visited, boarding and alighting stops included.
    stops: Vec<StopId>,
    /// Polyline for rendering; may be empty when no geometry is known.
    path: Vec<GeoPoint>,
    /// Sum of the ride edge costs along this leg, in minutes.
    ride_minutes: f64,
}

impl Leg {
    /// Construct a leg from the stops visited on one route.
    ///
    /// # Errors
    ///
    /// Returns `Err` if fewer than two stops are given or the first and
    /// last stop coincide.
    ///
    /// # Examples
    ///
    /// ```
    /// use journey_planner::domain::{Leg, Route, RouteId, StopId, TransportMode};
    ///
    /// let route = Route::new(RouteId::new(6).unwrap(), "Frankston", TransportMode::Train);
    /// let stops = vec![StopId::new(1), StopId::new(2), StopId::new(3)];
    ///
    /// let leg = Leg::new(route.summary(), stops, Vec::new(), 10.0).unwrap();
    /// assert_eq!(leg.origin(), StopId::new(1));
    /// assert_eq!(leg.destination(), StopId::new(3));
    ///
    /// let loop_leg = Leg::new(route.summary(), vec![StopId::new(1), StopId::new(1)], Vec::new(), 0.0);
    /// assert!(loop_leg.is_err());
    /// ```
    pub fn new(
        route: RouteSummary,
        stops: Vec<StopId>,
        path: Vec<GeoPoint>,
        ride_minutes: f64,
    ) -> Result<Self, DomainError> {
        let (origin, destination) = match (stops.first(), stops.last()) {
            (Some(&first), Some(&last)) if stops.len() >= 2 => (first, last),
            (Some(&first), _) => return Err(DomainError::DegenerateLeg(first)),
            _ => return Err(DomainError::EmptyItinerary),
        };
        if origin == destination {
            return Err(DomainError::DegenerateLeg(origin));
        }

        Ok(Self {
            origin,
            destination,
            route,
            stops,
            path,
            ride_minutes,
        })
    }

    pub fn origin(&self) -> StopId {
        self.origin
    }

    pub fn destination(&self) -> StopId {
        self.destination
    }

    pub fn route(&self) -> &RouteSummary {
        &self.route
    }

    pub fn stops(&self) -> &[StopId] {
        &self.stops
    }

    pub fn path(&self) -> &[GeoPoint] {
        &self.path
    }

    /// Scheduled ride time in minutes, as costed in the graph.
    pub fn ride_minutes(&self) -> f64 {
        self.ride_minutes
    }

    /// Number of stops after boarding.
    pub fn stop_count(&self) -> usize {
        self.stops.len() - 1
    }

    /// Identity used when deduplicating itineraries.
    ///
    /// Pattern variants of the same base route share a signature.
    pub fn signature(&self) -> String {
        format!(
            "{}-{}-{}",
            self.origin,
            self.route.id.normalized(),
            self.destination
        )
    }
}
