//! Scenario tests for the journey search.

use std::collections::HashSet;
use std::sync::Arc;

use super::*;
use crate::domain::{GeoPoint, Itinerary, Route, RouteId, Stop, StopId, TransportMode};
use crate::graph::{
    GraphConfig, GraphError, GraphPath, InMemoryNetworkStore, Network, NetworkStore, NodeKey,
    RouteFilter, RouteSchedule,
};

fn sid(id: u32) -> StopId {
    StopId::new(id)
}

fn rid(id: u32) -> RouteId {
    RouteId::new(id).unwrap()
}

/// Small network assembled route by route.
#[derive(Default)]
struct TestNetwork {
    stops: Vec<Stop>,
    routes: Vec<Route>,
    schedules: Vec<RouteSchedule>,
}

impl TestNetwork {
    fn stop(mut self, id: u32, name: &str) -> Self {
        self.stops.push(Stop::new(
            sid(id),
            name,
            GeoPoint::new(-37.8, 144.9 + f64::from(id) / 100.0),
            TransportMode::Train,
        ));
        self
    }

    fn stops(mut self, ids: &[u32]) -> Self {
        for &id in ids {
            self = self.stop(id, &format!("Stop {id}"));
        }
        self
    }

    fn route(self, id: u32, mode: TransportMode, stops: &[u32], minutes: &[f64]) -> Self {
        self.route_with(Route::new(rid(id), format!("Route {id}"), mode), stops, minutes)
    }

    fn route_with(mut self, route: Route, stops: &[u32], minutes: &[f64]) -> Self {
        self.schedules.push(RouteSchedule::new(
            route.id,
            stops.iter().copied().map(sid).collect(),
            minutes.to_vec(),
        ));
        self.routes.push(route);
        self
    }

    fn search(self) -> JourneySearch<InMemoryNetworkStore> {
        self.search_with(BoardingRules::default())
    }

    fn search_with(self, rules: BoardingRules) -> JourneySearch<InMemoryNetworkStore> {
        let network = Network::new(self.stops, self.routes, self.schedules).unwrap();
        let store = InMemoryNetworkStore::new(network, GraphConfig::default());
        JourneySearch::new(Arc::new(store), SearchConfig::default(), rules)
    }
}

fn route_ids(itinerary: &Itinerary) -> Vec<u32> {
    itinerary.legs().iter().map(|l| l.route().id.get()).collect()
}

// ============ Scenarios ============

#[test]
fn two_leg_journey_via_interchange() {
    let search = TestNetwork::default()
        .stops(&[1, 2, 3])
        .route(1, TransportMode::Train, &[1, 2], &[10.0])
        .route(2, TransportMode::Tram, &[2, 3], &[7.0])
        .search();

    let result = search.search(&SearchRequest::new(sid(1), sid(3), 3)).unwrap();

    assert_eq!(result.itineraries.len(), 1);
    let it = &result.itineraries[0];
    assert_eq!(it.legs().len(), 2);

    let first = &it.legs()[0];
    assert_eq!((first.origin(), first.destination()), (sid(1), sid(2)));
    assert_eq!(first.route().id, rid(1));

    let second = &it.legs()[1];
    assert_eq!((second.origin(), second.destination()), (sid(2), sid(3)));
    assert_eq!(second.route().id, rid(2));

    // ride + transfer penalty + ride
    assert_eq!(it.cost(), 10.0 + 5.0 + 7.0);
    assert_eq!(it.path_cost(), 27.0);
}

#[test]
fn direct_journey_is_single_leg() {
    let search = TestNetwork::default()
        .stops(&[1, 2, 3])
        .route(1, TransportMode::Train, &[1, 2, 3], &[4.0, 6.0])
        .search();

    let result = search.search(&SearchRequest::new(sid(1), sid(3), 3)).unwrap();

    assert_eq!(result.itineraries.len(), 1);
    let it = &result.itineraries[0];
    assert_eq!(it.legs().len(), 1);
    assert_eq!(it.legs()[0].stops(), &[sid(1), sid(2), sid(3)]);
    assert_eq!(it.legs()[0].ride_minutes(), 10.0);
    assert_eq!(it.cost(), 10.0);
}

#[test]
fn travels_against_route_direction() {
    let search = TestNetwork::default()
        .stops(&[1, 2, 3])
        .route(1, TransportMode::Tram, &[1, 2, 3], &[4.0, 6.0])
        .search();

    let result = search.search(&SearchRequest::new(sid(3), sid(1), 3)).unwrap();

    let leg = &result.itineraries[0].legs()[0];
    assert_eq!(leg.stops(), &[sid(3), sid(2), sid(1)]);
    // geometry follows direction of travel
    assert_eq!(leg.path().len(), 3);
    assert!(leg.path()[0].longitude > leg.path()[2].longitude);
}

#[test]
fn same_stop_returns_empty() {
    let search = TestNetwork::default()
        .stops(&[1, 2])
        .route(1, TransportMode::Train, &[1, 2], &[3.0])
        .search();

    let result = search.search(&SearchRequest::new(sid(1), sid(1), 3)).unwrap();
    assert!(result.is_empty());
    assert!(result.legs.is_empty());
}

#[test]
fn unknown_stop_returns_empty() {
    let search = TestNetwork::default()
        .stops(&[1, 2])
        .route(1, TransportMode::Train, &[1, 2], &[3.0])
        .search();

    assert!(search.search(&SearchRequest::new(sid(1), sid(99), 3)).unwrap().is_empty());
    assert!(search.search(&SearchRequest::new(sid(99), sid(1), 3)).unwrap().is_empty());
}

#[test]
fn disconnected_stops_return_empty() {
    let search = TestNetwork::default()
        .stops(&[1, 2, 3, 4])
        .route(1, TransportMode::Train, &[1, 2], &[3.0])
        .route(2, TransportMode::Train, &[3, 4], &[3.0])
        .search();

    let result = search.search(&SearchRequest::new(sid(1), sid(4), 3)).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.candidates_examined, 0);
}

#[test]
fn zero_k_returns_empty() {
    let search = TestNetwork::default()
        .stops(&[1, 2])
        .route(1, TransportMode::Train, &[1, 2], &[3.0])
        .search();

    assert!(search.search(&SearchRequest::new(sid(1), sid(2), 0)).unwrap().is_empty());
}

// ============ Boarding rules ============

fn regional_network() -> TestNetwork {
    TestNetwork::default()
        .stop(1, "Southern Cross Station")
        .stop(2, "Footscray Station")
        .stop(3, "Geelong Station")
        .route(50, TransportMode::Regional, &[1, 2, 3], &[5.0, 40.0])
        .route(6, TransportMode::Train, &[1, 2], &[6.0])
}

#[test]
fn regional_route_may_pass_blocked_station() {
    let search = regional_network().search();

    let result = search.search(&SearchRequest::new(sid(1), sid(3), 3)).unwrap();

    assert_eq!(result.itineraries.len(), 1);
    let leg = &result.itineraries[0].legs()[0];
    assert_eq!(leg.route().id, rid(50));
    assert_eq!(leg.stops(), &[sid(1), sid(2), sid(3)]);
}

#[test]
fn regional_route_not_boarded_at_blocked_station() {
    let search = regional_network().search();

    let result = search.search(&SearchRequest::new(sid(2), sid(3), 3)).unwrap();

    // The direct regional ride from Footscray is refused; the only survivor
    // doubles back to Southern Cross on the metro line.
    assert_eq!(result.itineraries.len(), 1);
    let it = &result.itineraries[0];
    assert_eq!(route_ids(it), vec![6, 50]);
    for leg in it.legs().iter().filter(|l| l.route().mode == TransportMode::Regional) {
        assert_ne!(leg.origin(), sid(2));
        assert_ne!(leg.destination(), sid(2));
    }
}

#[test]
fn regional_route_not_alighted_at_blocked_station() {
    let search = TestNetwork::default()
        .stop(1, "Southern Cross Station")
        .stop(2, "Sunshine Station")
        .route(50, TransportMode::Regional, &[1, 2], &[12.0])
        .search();

    assert!(search.search(&SearchRequest::new(sid(1), sid(2), 3)).unwrap().is_empty());
}

#[test]
fn permissive_rules_allow_any_stop() {
    let search = regional_network().search_with(BoardingRules::permissive());

    let result = search.search(&SearchRequest::new(sid(2), sid(3), 3)).unwrap();
    assert_eq!(route_ids(&result.itineraries[0]), vec![50]);
}

// ============ Dedup and bounds ============

#[test]
fn route_patterns_deduplicated() {
    let search = TestNetwork::default()
        .stops(&[1, 2, 3])
        .route(14_001, TransportMode::Train, &[1, 3], &[10.0])
        .route(14_002, TransportMode::Train, &[1, 2, 3], &[4.0, 8.0])
        .search();

    let result = search.search(&SearchRequest::new(sid(1), sid(3), 3)).unwrap();

    assert_eq!(result.candidates_examined, 2);
    assert_eq!(result.itineraries.len(), 1);
    assert_eq!(route_ids(&result.itineraries[0]), vec![14_001]);
}

fn parallel_routes(count: u32) -> JourneySearch<InMemoryNetworkStore> {
    let mut net = TestNetwork::default().stops(&[1, 2]);
    for i in 1..=count {
        net = net.route(i, TransportMode::Bus, &[1, 2], &[f64::from(i)]);
    }
    net.search()
}

#[test]
fn result_capped_at_three() {
    let search = parallel_routes(5);

    let result = search.search(&SearchRequest::new(sid(1), sid(2), 10)).unwrap();
    assert_eq!(result.itineraries.len(), 3);
    assert_eq!(result.candidates_examined, 5);

    let ids: Vec<u32> = result.itineraries.iter().map(|it| route_ids(it)[0]).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn result_respects_smaller_k() {
    let search = parallel_routes(5);

    assert_eq!(search.search(&SearchRequest::new(sid(1), sid(2), 1)).unwrap().itineraries.len(), 1);
    assert_eq!(search.search(&SearchRequest::new(sid(1), sid(2), 2)).unwrap().itineraries.len(), 2);
}

#[test]
fn flattened_legs_follow_itineraries() {
    let search = TestNetwork::default()
        .stops(&[1, 2, 3])
        .route(1, TransportMode::Train, &[1, 2], &[10.0])
        .route(2, TransportMode::Tram, &[2, 3], &[7.0])
        .route(3, TransportMode::Bus, &[1, 3], &[30.0])
        .search();

    let result = search.search(&SearchRequest::new(sid(1), sid(3), 3)).unwrap();

    assert_eq!(result.itineraries.len(), 2);
    let expected: usize = result.itineraries.iter().map(|it| it.legs().len()).sum();
    assert_eq!(result.legs.len(), expected);
    assert_eq!(result.legs[0], result.itineraries[0].legs()[0]);
}

// ============ Replacement services ============

fn replacement_network() -> JourneySearch<InMemoryNetworkStore> {
    let mut bus = Route::new(rid(2), "Rail Replacement", TransportMode::Bus);
    bus.is_replacement = true;
    TestNetwork::default()
        .stops(&[1, 2])
        .route(1, TransportMode::Train, &[1, 2], &[10.0])
        .route_with(bus, &[1, 2], &[5.0])
        .search()
}

#[test]
fn replacement_services_included_by_default() {
    let result = replacement_network()
        .search(&SearchRequest::new(sid(1), sid(2), 3))
        .unwrap();

    let ids: Vec<u32> = result.itineraries.iter().map(|it| route_ids(it)[0]).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn replacement_services_excluded_on_request() {
    let result = replacement_network()
        .search(&SearchRequest::new(sid(1), sid(2), 3).excluding_replacements())
        .unwrap();

    let ids: Vec<u32> = result.itineraries.iter().map(|it| route_ids(it)[0]).collect();
    assert_eq!(ids, vec![1]);
}

// ============ Store failure ============

/// Store whose graph query always fails.
struct FailingStore {
    stops: Vec<Stop>,
}

impl NetworkStore for FailingStore {
    fn k_shortest_paths(
        &self,
        _from: NodeKey,
        _to: NodeKey,
        _k: usize,
        _filter: &RouteFilter,
    ) -> Result<Vec<GraphPath>, GraphError> {
        Err(GraphError::Unavailable("connection refused".into()))
    }

    fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.iter().find(|s| s.id == id)
    }

    fn route(&self, _id: RouteId) -> Option<&Route> {
        None
    }

    fn segment_geometry(&self, _route: RouteId, _from: StopId, _to: StopId) -> Vec<GeoPoint> {
        Vec::new()
    }

    fn transfer_penalty(&self) -> f64 {
        5.0
    }
}

#[test]
fn store_failure_is_an_error() {
    let stops = [1, 2]
        .into_iter()
        .map(|i| Stop::new(sid(i), "S", GeoPoint::new(0.0, 0.0), TransportMode::Bus))
        .collect();
    let search = JourneySearch::new(
        Arc::new(FailingStore { stops }),
        SearchConfig::default(),
        BoardingRules::default(),
    );

    let err = search.search(&SearchRequest::new(sid(1), sid(2), 3)).unwrap_err();
    assert!(matches!(err, SearchError::Graph(GraphError::Unavailable(_))));
}

// ============ Properties ============

mod proptests {
    use super::*;
    use proptest::prelude::*;

    const STOPS: u32 = 6;

    fn routes_strategy() -> impl Strategy<Value = Vec<(Vec<u32>, Vec<f64>)>> {
        let route = (
            prop::sample::subsequence((1..=STOPS).collect::<Vec<_>>(), 2..=4),
            prop::collection::vec(0.5f64..20.0, 3),
        )
            .prop_map(|(stops, mut minutes)| {
                minutes.truncate(stops.len() - 1);
                (stops, minutes)
            });
        prop::collection::vec(route, 1..6)
    }

    fn build(routes: &[(Vec<u32>, Vec<f64>)]) -> JourneySearch<InMemoryNetworkStore> {
        let mut net = TestNetwork::default().stops(&(1..=STOPS).collect::<Vec<_>>());
        for (i, (stops, minutes)) in routes.iter().enumerate() {
            net = net.route(i as u32 + 1, TransportMode::Tram, stops, minutes);
        }
        net.search()
    }

    proptest! {
        #[test]
        fn itineraries_satisfy_invariants(routes in routes_strategy(), k in 1usize..6) {
            let search = build(&routes);

            for origin in 1..=STOPS {
                for destination in 1..=STOPS {
                    let request = SearchRequest::new(sid(origin), sid(destination), k);
                    let result = search.search(&request).unwrap();

                    prop_assert!(result.itineraries.len() <= k.min(3));

                    let mut signatures = HashSet::new();
                    let mut last_cost = f64::NEG_INFINITY;
                    for it in &result.itineraries {
                        prop_assert_eq!(it.origin(), sid(origin));
                        prop_assert_eq!(it.destination(), sid(destination));
                        for pair in it.legs().windows(2) {
                            prop_assert_eq!(pair[0].destination(), pair[1].origin());
                        }
                        prop_assert!(signatures.insert(it.signature()));
                        prop_assert!(it.cost() + 1e-9 >= last_cost);
                        last_cost = it.cost();
                    }
                }
            }
        }
    }
}
