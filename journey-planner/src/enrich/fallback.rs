//! Single timing attempts.
//!
//! Each attempt returns the time it found or the reason it could not, so the
//! caller always knows which tier a leg ended up on.

use chrono::{DateTime, TimeDelta, Utc};

use super::EnrichConfig;
use crate::domain::{Leg, Tier};
use crate::live::{DepartureQuery, LiveError, LiveSource, PatternCall};

/// Why a timing attempt fell through to the next tier.
#[derive(Debug, thiserror::Error)]
pub enum Degraded {
    /// The leg's route has no id in the live API
    #[error("route has no live id")]
    NoLiveRoute,

    /// The live call failed
    #[error("live call failed: {0}")]
    Live(#[from] LiveError),

    /// The board had no matching departure in range
    #[error("no matching departure")]
    NoDeparture,

    /// The departure carries no run reference
    #[error("departure has no run reference")]
    NoRun,

    /// The run's pattern has no usable time at the destination
    #[error("destination missing from run pattern")]
    NotInPattern,
}

/// A chosen departure for one leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub time: DateTime<Utc>,
    pub tier: Tier,
    pub run_ref: Option<String>,
}

impl Departure {
    pub fn synthetic(time: DateTime<Utc>) -> Self {
        Self {
            time,
            tier: Tier::SyntheticHeadway,
            run_ref: None,
        }
    }

    pub fn graph_fallback(time: DateTime<Utc>) -> Self {
        Self {
            time,
            tier: Tier::GraphFallback,
            run_ref: None,
        }
    }
}

/// Departure board for `leg`'s route at its origin, from `after` on.
///
/// Rows for other routes and rows without any time are dropped; what
/// remains is sorted by time.
pub async fn route_board<S: LiveSource + ?Sized>(
    source: &S,
    leg: &Leg,
    after: DateTime<Utc>,
    config: &EnrichConfig,
) -> Result<Vec<Departure>, Degraded> {
    let live_id = leg.route().live_id.ok_or(Degraded::NoLiveRoute)?;
    let query = DepartureQuery::new(leg.route().mode, leg.origin(), config.board_size)
        .on_route(live_id)
        .after(after);

    let board = source.departures(&query).await?;
    let mut departures: Vec<Departure> = board
        .into_iter()
        .filter(|d| d.route_id == live_id)
        .filter_map(|d| {
            let time = d.time()?;
            Some(Departure {
                time,
                tier: Tier::Realtime,
                run_ref: d.run_ref,
            })
        })
        .collect();
    departures.sort_by_key(|d| d.time);
    Ok(departures)
}

/// First live departure of `leg`'s route strictly after `earliest`.
pub async fn live_departure<S: LiveSource + ?Sized>(
    source: &S,
    leg: &Leg,
    earliest: DateTime<Utc>,
    config: &EnrichConfig,
) -> Result<Departure, Degraded> {
    route_board(source, leg, earliest, config)
        .await?
        .into_iter()
        .find(|d| d.time > earliest)
        .ok_or(Degraded::NoDeparture)
}

/// Arrival at `leg`'s destination read from the departing run's pattern.
///
/// The run may pass the destination more than once; the first call there
/// at or after the departure is the one the passenger rides to.
pub async fn pattern_arrival<S: LiveSource + ?Sized>(
    source: &S,
    leg: &Leg,
    departure: &Departure,
) -> Result<DateTime<Utc>, Degraded> {
    let run_ref = departure.run_ref.as_deref().ok_or(Degraded::NoRun)?;
    let pattern = source.pattern(run_ref, leg.route().mode).await?;
    pattern
        .iter()
        .filter(|call| call.stop == leg.destination())
        .filter_map(PatternCall::time)
        .find(|&arrival| arrival >= departure.time)
        .ok_or(Degraded::NotInPattern)
}

/// Ride duration from the graph cost, or the default if that's zero.
pub fn estimated_duration(leg: &Leg, config: &EnrichConfig) -> TimeDelta {
    let seconds = (leg.ride_minutes() * 60.0).round();
    if seconds.is_finite() && seconds >= 1.0 {
        TimeDelta::seconds(seconds as i64)
    } else {
        config.default_leg()
    }
}
