//! The live departures collaborator.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LiveError;
use crate::domain::{StopId, TransportMode};

/// A departure board query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DepartureQuery {
    pub mode: TransportMode,
    pub stop: StopId,
    /// Restrict to one route (live API id).
    pub route: Option<u32>,
    pub max_results: usize,
    /// Only departures from this time on.
    pub after: Option<DateTime<Utc>>,
}

impl DepartureQuery {
    pub fn new(mode: TransportMode, stop: StopId, max_results: usize) -> Self {
        Self {
            mode,
            stop,
            route: None,
            max_results,
            after: None,
        }
    }

    pub fn on_route(mut self, route: u32) -> Self {
        self.route = Some(route);
        self
    }

    pub fn after(mut self, time: DateTime<Utc>) -> Self {
        self.after = Some(time);
        self
    }
}

/// A departure reported by the live source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveDeparture {
    pub stop: StopId,
    /// Route id in the live API.
    pub route_id: u32,
    pub run_ref: Option<String>,
    pub scheduled: Option<DateTime<Utc>>,
    pub estimated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub platform: Option<String>,
}

impl LiveDeparture {
    /// Best known departure time: the estimate if present, else the timetable.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.estimated.or(self.scheduled)
    }
}

/// One stop of a run's pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCall {
    pub stop: StopId,
    pub scheduled: Option<DateTime<Utc>>,
    pub estimated: Option<DateTime<Utc>>,
}

impl PatternCall {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.estimated.or(self.scheduled)
    }
}

/// Source of live departures and run patterns.
///
/// This abstraction lets enrichment run against the real timetable API,
/// a cached or rate-limited wrapper, or mock data.
pub trait LiveSource: Send + Sync {
    /// Departures at a stop, in no particular order.
    fn departures(
        &self,
        query: &DepartureQuery,
    ) -> impl Future<Output = Result<Vec<LiveDeparture>, LiveError>> + Send;

    /// Stop-level times of one run, in stopping order.
    fn pattern(
        &self,
        run_ref: &str,
        mode: TransportMode,
    ) -> impl Future<Output = Result<Vec<PatternCall>, LiveError>> + Send;
}

impl<S: LiveSource + ?Sized> LiveSource for Arc<S> {
    fn departures(
        &self,
        query: &DepartureQuery,
    ) -> impl Future<Output = Result<Vec<LiveDeparture>, LiveError>> + Send {
        (**self).departures(query)
    }

    fn pattern(
        &self,
        run_ref: &str,
        mode: TransportMode,
    ) -> impl Future<Output = Result<Vec<PatternCall>, LiveError>> + Send {
        (**self).pattern(run_ref, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn estimate_preferred_over_schedule() {
        let scheduled = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let estimated = Utc.with_ymd_and_hms(2025, 3, 1, 8, 3, 0).unwrap();

        let mut dep = LiveDeparture {
            stop: StopId::new(1),
            route_id: 6,
            run_ref: None,
            scheduled: Some(scheduled),
            estimated: None,
            platform: None,
        };
        assert_eq!(dep.time(), Some(scheduled));

        dep.estimated = Some(estimated);
        assert_eq!(dep.time(), Some(estimated));

        dep.scheduled = None;
        dep.estimated = None;
        assert_eq!(dep.time(), None);
    }

    #[test]
    fn query_builder() {
        let after = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let q = DepartureQuery::new(TransportMode::Tram, StopId::new(2), 10)
            .on_route(59)
            .after(after);

        assert_eq!(q.route, Some(59));
        assert_eq!(q.after, Some(after));
        assert_eq!(q.max_results, 10);
    }
}
