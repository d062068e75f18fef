//! Static network data.
//!
//! A `Network` holds the stops, routes and per-route schedules that the
//! graph is derived from. It is loaded once (usually from a JSON export of
//! the schedule database) and shared read-only across requests.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::GraphError;
use crate::domain::{GeoPoint, Route, RouteId, Stop, StopId};

/// Ordered stop sequence of one route with schedule-derived travel costs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteSchedule {
    pub route: RouteId,
    /// Stops in canonical direction of travel.
    pub stops: Vec<StopId>,
    /// Minutes between `stops[i]` and `stops[i + 1]`.
    pub segment_minutes: Vec<f64>,
    /// Route shape in canonical direction.
    #[serde(default)]
    pub shape: Vec<GeoPoint>,
    /// Index into `shape` closest to each stop. Same length as `stops`
    /// when present.
    #[serde(default)]
    pub stop_shape_indices: Vec<usize>,
}

impl RouteSchedule {
    /// Build a schedule without geometry.
    pub fn new(route: RouteId, stops: Vec<StopId>, segment_minutes: Vec<f64>) -> Self {
        Self {
            route,
            stops,
            segment_minutes,
            shape: Vec::new(),
            stop_shape_indices: Vec::new(),
        }
    }

    /// Consecutive stop pairs with their travel cost.
    pub fn segments(&self) -> impl Iterator<Item = (StopId, StopId, f64)> + '_ {
        self.stops
            .windows(2)
            .zip(&self.segment_minutes)
            .map(|(pair, &mins)| (pair[0], pair[1], mins))
    }

    fn position(&self, stop: StopId) -> Option<usize> {
        self.stops.iter().position(|&s| s == stop)
    }

    fn validate(&self) -> Result<(), GraphError> {
        let invalid = |reason| GraphError::InvalidSchedule {
            route: self.route,
            reason,
        };

        if self.stops.len() < 2 {
            return Err(invalid("needs at least two stops"));
        }
        if self.segment_minutes.len() + 1 != self.stops.len() {
            return Err(invalid("segment count must be one less than stop count"));
        }
        if self
            .segment_minutes
            .iter()
            .any(|m| !m.is_finite() || *m < 0.0)
        {
            return Err(invalid("segment minutes must be finite and non-negative"));
        }
        if !self.stop_shape_indices.is_empty() {
            if self.stop_shape_indices.len() != self.stops.len() {
                return Err(invalid("shape index count must match stop count"));
            }
            if self.stop_shape_indices.iter().any(|&i| i >= self.shape.len()) {
                return Err(invalid("shape index out of range"));
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct NetworkFile {
    stops: Vec<Stop>,
    routes: Vec<Route>,
    schedules: Vec<RouteSchedule>,
}

/// Validated in-memory network.
///
/// # Invariants
///
/// - Stop and route ids are unique
/// - Every schedule references a known route and known stops
/// - Every schedule has one segment cost per consecutive stop pair
#[derive(Debug, Clone, Default)]
pub struct Network {
    stops: HashMap<StopId, Stop>,
    routes: HashMap<RouteId, Route>,
    schedules: Vec<RouteSchedule>,
}

impl Network {
    /// Construct a network, validating cross references.
    pub fn new(
        stops: Vec<Stop>,
        routes: Vec<Route>,
        schedules: Vec<RouteSchedule>,
    ) -> Result<Self, GraphError> {
        let mut stop_map = HashMap::with_capacity(stops.len());
        for stop in stops {
            let id = stop.id;
            if stop_map.insert(id, stop).is_some() {
                return Err(GraphError::Duplicate {
                    kind: "stop",
                    id: id.get(),
                });
            }
        }

        let mut route_map = HashMap::with_capacity(routes.len());
        for route in routes {
            let id = route.id;
            if route_map.insert(id, route).is_some() {
                return Err(GraphError::Duplicate {
                    kind: "route",
                    id: id.get(),
                });
            }
        }

        for schedule in &schedules {
            if !route_map.contains_key(&schedule.route) {
                return Err(GraphError::UnknownRoute(schedule.route));
            }
            schedule.validate()?;
            if let Some(&stop) = schedule.stops.iter().find(|s| !stop_map.contains_key(s)) {
                return Err(GraphError::UnknownStop {
                    route: schedule.route,
                    stop,
                });
            }
        }

        Ok(Self {
            stops: stop_map,
            routes: route_map,
            schedules,
        })
    }

    /// Parse a network from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let file: NetworkFile = serde_json::from_str(json)?;
        Self::new(file.stops, file.routes, file.schedules)
    }

    /// Load a network from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let network = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            stops = network.stops.len(),
            routes = network.routes.len(),
            "loaded network"
        );
        Ok(network)
    }

    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(&id)
    }

    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(&id)
    }

    pub fn schedules(&self) -> &[RouteSchedule] {
        &self.schedules
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Polyline of `route` between two of its stops.
    ///
    /// Uses the stored shape when the schedule has one, otherwise the stop
    /// coordinates. Reversed when travelling against the canonical direction.
    /// Empty if the route does not serve both stops.
    pub fn segment_geometry(&self, route: RouteId, from: StopId, to: StopId) -> Vec<GeoPoint> {
        let Some((schedule, a, b)) = self
            .schedules
            .iter()
            .filter(|s| s.route == route)
            .find_map(|s| Some((s, s.position(from)?, s.position(to)?)))
        else {
            return Vec::new();
        };

        let (lo, hi) = (a.min(b), a.max(b));
        let mut points: Vec<GeoPoint> = if schedule.stop_shape_indices.is_empty() {
            schedule.stops[lo..=hi]
                .iter()
                .filter_map(|s| self.stops.get(s).map(|stop| stop.location))
                .collect()
        } else {
            let (start, end) = (
                schedule.stop_shape_indices[lo],
                schedule.stop_shape_indices[hi],
            );
            schedule.shape[start.min(end)..=start.max(end)].to_vec()
        };

        if a > b {
            points.reverse();
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportMode;
    use std::io::Write;

    fn stop(id: u32) -> Stop {
        Stop::new(
            StopId::new(id),
            format!("Stop {id}"),
            GeoPoint::new(-37.8, 144.9 + f64::from(id) / 100.0),
            TransportMode::Tram,
        )
    }

    fn route(id: u32) -> Route {
        Route::new(RouteId::new(id).unwrap(), format!("Route {id}"), TransportMode::Tram)
    }

    fn ids(raw: &[u32]) -> Vec<StopId> {
        raw.iter().copied().map(StopId::new).collect()
    }

    #[test]
    fn rejects_unknown_stop() {
        let schedule = RouteSchedule::new(RouteId::new(1).unwrap(), ids(&[1, 9]), vec![2.0]);
        let err = Network::new(vec![stop(1)], vec![route(1)], vec![schedule]).unwrap_err();
        assert!(matches!(err, GraphError::UnknownStop { stop, .. } if stop == StopId::new(9)));
    }

    #[test]
    fn rejects_unknown_route() {
        let schedule = RouteSchedule::new(RouteId::new(2).unwrap(), ids(&[1, 2]), vec![2.0]);
        let err = Network::new(vec![stop(1), stop(2)], vec![route(1)], vec![schedule]).unwrap_err();
        assert!(matches!(err, GraphError::UnknownRoute(_)));
    }

    #[test]
    fn rejects_segment_length_mismatch() {
        let schedule = RouteSchedule::new(RouteId::new(1).unwrap(), ids(&[1, 2, 3]), vec![2.0]);
        let err = Network::new(
            vec![stop(1), stop(2), stop(3)],
            vec![route(1)],
            vec![schedule],
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::InvalidSchedule { .. }));
    }

    #[test]
    fn rejects_negative_cost() {
        let schedule = RouteSchedule::new(RouteId::new(1).unwrap(), ids(&[1, 2]), vec![-1.0]);
        let err = Network::new(vec![stop(1), stop(2)], vec![route(1)], vec![schedule]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidSchedule { .. }));
    }

    #[test]
    fn rejects_duplicate_stop() {
        let err = Network::new(vec![stop(1), stop(1)], Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, GraphError::Duplicate { kind: "stop", id: 1 }));
    }

    #[test]
    fn geometry_falls_back_to_stop_coordinates() {
        let r = RouteId::new(1).unwrap();
        let schedule = RouteSchedule::new(r, ids(&[1, 2, 3]), vec![2.0, 3.0]);
        let net = Network::new(
            vec![stop(1), stop(2), stop(3)],
            vec![route(1)],
            vec![schedule],
        )
        .unwrap();

        let forward = net.segment_geometry(r, StopId::new(1), StopId::new(3));
        assert_eq!(forward.len(), 3);
        assert_eq!(forward[0], stop(1).location);

        let backward = net.segment_geometry(r, StopId::new(3), StopId::new(2));
        assert_eq!(backward, vec![stop(3).location, stop(2).location]);

        assert!(net.segment_geometry(r, StopId::new(1), StopId::new(7)).is_empty());
    }

    #[test]
    fn geometry_slices_shape() {
        let r = RouteId::new(1).unwrap();
        let mut schedule = RouteSchedule::new(r, ids(&[1, 2]), vec![2.0]);
        schedule.shape = (0..5).map(|i| GeoPoint::new(0.0, f64::from(i))).collect();
        schedule.stop_shape_indices = vec![1, 3];
        let net = Network::new(vec![stop(1), stop(2)], vec![route(1)], vec![schedule]).unwrap();

        let path = net.segment_geometry(r, StopId::new(2), StopId::new(1));
        let lons: Vec<f64> = path.iter().map(|p| p.longitude).collect();
        assert_eq!(lons, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn load_from_file() {
        let json = r#"{
            "stops": [
                {"id": 1, "name": "A", "location": {"latitude": 0.0, "longitude": 0.0}, "mode": "bus"},
                {"id": 2, "name": "B", "location": {"latitude": 0.0, "longitude": 1.0}, "mode": "bus"}
            ],
            "routes": [
                {"id": 901, "name": "Route 901", "mode": "bus", "gtfs_id": "901"}
            ],
            "schedules": [
                {"route": 901, "stops": [1, 2], "segment_minutes": [4.5]}
            ]
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let net = Network::load(file.path()).unwrap();
        assert_eq!(net.stop_count(), 2);
        assert_eq!(net.schedules()[0].segments().next().unwrap().2, 4.5);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Network::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, GraphError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = Network::from_json("{\"stops\": 3}").unwrap_err();
        assert!(matches!(err, GraphError::Json(_)));
    }

    #[test]
    fn sample_network_loads() {
        let network = Network::load("data/network.json").unwrap();

        assert_eq!(network.stop_count(), 9);
        let replacement = network.route(RouteId::new(901).unwrap()).unwrap();
        assert!(replacement.is_replacement);
    }
}
