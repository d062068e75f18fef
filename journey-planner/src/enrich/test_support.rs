//! Fixtures shared by the enrichment tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{Itinerary, Leg, Route, RouteId, StopId, TransportMode};
use crate::live::{LiveDeparture, PatternCall};

pub fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, h, m, 0).unwrap()
}

/// A leg on a route with no external id.
pub fn leg(route: u32, mode: TransportMode, stops: &[u32], minutes: f64) -> Leg {
    let route = Route::new(RouteId::new(route).unwrap(), format!("Route {route}"), mode);
    Leg::new(
        route.summary(),
        stops.iter().copied().map(StopId::new).collect(),
        Vec::new(),
        minutes,
    )
    .unwrap()
}

/// A tram leg whose route is `live_id` in the live API.
pub fn tram_leg(live_id: u32, stops: &[u32], minutes: f64) -> Leg {
    let mut route = Route::new(
        RouteId::new(live_id).unwrap(),
        format!("Route {live_id}"),
        TransportMode::Tram,
    );
    route.external_id = Some(live_id);
    Leg::new(
        route.summary(),
        stops.iter().copied().map(StopId::new).collect(),
        Vec::new(),
        minutes,
    )
    .unwrap()
}

pub fn itinerary(legs: Vec<Leg>) -> Itinerary {
    let cost = legs.iter().map(Leg::ride_minutes).sum();
    Itinerary::new(legs, cost, cost).unwrap()
}

pub fn departure(stop: u32, route: u32, time: DateTime<Utc>, run: &str) -> LiveDeparture {
    LiveDeparture {
        stop: StopId::new(stop),
        route_id: route,
        run_ref: Some(run.to_string()),
        scheduled: Some(time),
        estimated: None,
        platform: None,
    }
}

pub fn call(stop: u32, time: DateTime<Utc>) -> PatternCall {
    PatternCall {
        stop: StopId::new(stop),
        scheduled: Some(time),
        estimated: None,
    }
}
