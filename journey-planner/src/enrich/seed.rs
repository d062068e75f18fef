//! First-leg departures.
//!
//! Each first departure seeds one variant. Live departures are preferred;
//! if the live source has none, evenly spaced departures are synthesized
//! from the requested time.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::EnrichConfig;
use super::fallback::{Departure, route_board};
use crate::domain::Leg;
use crate::live::LiveSource;

/// `count` departures from `requested`, one headway apart.
pub fn synthetic_departures(
    requested: DateTime<Utc>,
    count: usize,
    config: &EnrichConfig,
) -> Vec<Departure> {
    let headway = config.synthetic_headway();
    (0..count)
        .scan(requested, |time, _| {
            let departure = Departure::synthetic(*time);
            *time += headway;
            Some(departure)
        })
        .collect()
}

/// Up to `lookahead` first departures for `leg`, at or after `requested`.
pub async fn first_departures<S: LiveSource + ?Sized>(
    source: &S,
    leg: &Leg,
    requested: DateTime<Utc>,
    lookahead: usize,
    config: &EnrichConfig,
) -> Vec<Departure> {
    if lookahead == 0 {
        return Vec::new();
    }

    match route_board(source, leg, requested, config).await {
        Ok(board) => {
            let live: Vec<Departure> = board
                .into_iter()
                .filter(|d| d.time >= requested)
                .take(lookahead)
                .collect();
            if !live.is_empty() {
                return live;
            }
            debug!(stop = %leg.origin(), route = %leg.route().id, "no live first departures, synthesizing");
        }
        Err(reason) => {
            debug!(stop = %leg.origin(), route = %leg.route().id, %reason, "first departures unavailable, synthesizing");
        }
    }

    synthetic_departures(requested, lookahead, config)
}
