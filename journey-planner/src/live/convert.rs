//! Conversion from API response types to live departures.
//!
//! Entries missing a stop, a route or any parseable time are dropped
//! individually; one bad row never spoils a whole board.

use chrono::{DateTime, Utc};
use tracing::trace;

use super::types::{DepartureDto, DeparturesResponse, PatternResponse};
use super::{LiveDeparture, PatternCall};
use crate::domain::StopId;

fn parse_time(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            trace!(raw, error = %e, "unparseable timestamp");
            None
        }
    }
}

/// Run reference of a departure, falling back to the numeric run id.
fn run_ref(dto: &DepartureDto) -> Option<String> {
    dto.run_ref
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .or_else(|| dto.run_id.filter(|&id| id > 0).map(|id| id.to_string()))
}

/// Convert one departure row, or `None` if it's unusable.
pub fn convert_departure(dto: &DepartureDto) -> Option<LiveDeparture> {
    let scheduled = parse_time(dto.scheduled_departure_utc.as_deref());
    let estimated = parse_time(dto.estimated_departure_utc.as_deref());
    if scheduled.is_none() && estimated.is_none() {
        return None;
    }

    Some(LiveDeparture {
        stop: StopId::new(dto.stop_id?),
        route_id: dto.route_id?,
        run_ref: run_ref(dto),
        scheduled,
        estimated,
        platform: dto.platform_number.clone(),
    })
}

/// Convert a departure board.
pub fn convert_departures(resp: &DeparturesResponse) -> Vec<LiveDeparture> {
    let converted: Vec<LiveDeparture> = resp
        .departures
        .iter()
        .filter_map(convert_departure)
        .collect();
    let dropped = resp.departures.len() - converted.len();
    if dropped > 0 {
        trace!(dropped, "dropped unusable departures");
    }
    converted
}

/// Convert a run pattern, keeping stopping order.
pub fn convert_pattern(resp: &PatternResponse) -> Vec<PatternCall> {
    resp.departures
        .iter()
        .filter_map(|dto| {
            Some(PatternCall {
                stop: StopId::new(dto.stop_id?),
                scheduled: parse_time(dto.scheduled_departure_utc.as_deref()),
                estimated: parse_time(dto.estimated_departure_utc.as_deref()),
            })
        })
        .collect()
}
