//! Timetable API response types.
//!
//! These types match the JSON returned by the v3 timetable API.
//! They are deserialized directly from HTTP responses and then converted
//! to [`LiveDeparture`](super::LiveDeparture)s.
//!
//! Timestamps are kept as strings here; conversion drops entries whose
//! times don't parse rather than failing the whole board.

use serde::{Deserialize, Serialize};

/// Response from the departures endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeparturesResponse {
    #[serde(default)]
    pub departures: Vec<DepartureDto>,
}

/// Response from the run pattern endpoint.
///
/// A pattern is the list of stop-level departures of one run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PatternResponse {
    #[serde(default)]
    pub departures: Vec<DepartureDto>,
}

/// One departure (or one stop of a run pattern).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DepartureDto {
    #[serde(default)]
    pub stop_id: Option<u32>,

    #[serde(default)]
    pub route_id: Option<u32>,

    /// Opaque run identifier (e.g. "1-SDM-vpt-1.2")
    #[serde(default)]
    pub run_ref: Option<String>,

    /// Legacy numeric run id
    #[serde(default)]
    pub run_id: Option<i64>,

    #[serde(default)]
    pub direction_id: Option<i64>,

    /// Timetabled departure, RFC 3339 UTC
    #[serde(default)]
    pub scheduled_departure_utc: Option<String>,

    /// Real-time estimate, RFC 3339 UTC; absent when not tracked
    #[serde(default)]
    pub estimated_departure_utc: Option<String>,

    #[serde(default)]
    pub platform_number: Option<String>,

    #[serde(default)]
    pub at_platform: bool,
}
