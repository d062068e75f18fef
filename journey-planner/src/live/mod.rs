//! Live departures client.
//!
//! This module provides the [`LiveSource`] abstraction used by enrichment,
//! an HTTP client for the v3 timetable API, and decorators and mocks that
//! implement the same trait.
//!
//! Key characteristics of the timetable API:
//! - Requests are signed per URL with the developer's API key
//! - Times are RFC 3339 UTC; either the timetabled or the estimated time
//!   may be absent
//! - Run references are opaque strings, valid for pattern lookups

mod client;
mod convert;
mod error;
mod guarded;
mod mock;
mod source;
mod types;

pub use client::{DEFAULT_BASE_URL, LiveConfig, PtvClient, sign};
pub use convert::{convert_departure, convert_departures, convert_pattern};
pub use error::LiveError;
pub use guarded::Guarded;
pub use mock::{MockData, MockLiveSource};
pub use source::{DepartureQuery, LiveDeparture, LiveSource, PatternCall};
pub use types::{DepartureDto, DeparturesResponse, PatternResponse};
