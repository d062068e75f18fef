//! Graph model builder.
//!
//! Turns a [`Network`] into the weighted graph the path search runs on.
//! Each stop served by a route gets a route node; each stop also gets a
//! hub node joined to all of its route nodes by transfer edges, so changing
//! route (or boarding from / alighting to the hub anchor) always pays the
//! transfer penalty.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::{Network, NodeKey};
use crate::domain::{Route, RouteId};

/// Configuration for graph construction.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Cost of a full transfer in minutes, split evenly between the hub
    /// entry and exit halves.
    pub transfer_penalty_mins: f64,

    /// Number of filtered graphs kept in memory.
    pub cache_capacity: u64,
}

impl GraphConfig {
    pub fn new(transfer_penalty_mins: f64, cache_capacity: u64) -> Self {
        Self {
            transfer_penalty_mins,
            cache_capacity,
        }
    }

    /// Cost of one transfer edge (half the full penalty).
    pub fn transfer_half(&self) -> f64 {
        self.transfer_penalty_mins / 2.0
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            transfer_penalty_mins: 5.0,
            cache_capacity: 8,
        }
    }
}

/// Which routes to leave out of the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RouteFilter {
    /// Drop every route flagged as a replacement service.
    pub exclude_replacement: bool,
    /// Drop these routes by id.
    pub excluded_routes: BTreeSet<RouteId>,
}

impl RouteFilter {
    /// Filter that keeps every route.
    pub fn none() -> Self {
        Self::default()
    }

    /// Filter dropping replacement services.
    pub fn without_replacements() -> Self {
        Self {
            exclude_replacement: true,
            excluded_routes: BTreeSet::new(),
        }
    }

    pub fn allows(&self, route: &Route) -> bool {
        !(self.exclude_replacement && route.is_replacement)
            && !self.excluded_routes.contains(&route.id)
    }
}

/// Kind of graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Between consecutive stops on one route.
    Ride,
    /// Between a hub and a route node at the same stop.
    Transfer,
}

/// One direction of an undirected edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: NodeKey,
    pub cost: f64,
    pub kind: EdgeKind,
}

/// Undirected weighted graph over [`NodeKey`]s.
///
/// Parallel edges between the same pair keep the lowest cost.
#[derive(Debug, Clone, Default)]
pub struct TransitGraph {
    adjacency: HashMap<NodeKey, Vec<Edge>>,
    edge_count: usize,
}

impl TransitGraph {
    /// Neighbours of `node`, in insertion order.
    pub fn edges(&self, node: NodeKey) -> &[Edge] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, node: NodeKey) -> bool {
        self.adjacency.contains_key(&node)
    }

    /// Cost of the edge between two nodes, if any.
    pub fn cost(&self, from: NodeKey, to: NodeKey) -> Option<f64> {
        self.edges(from).iter().find(|e| e.to == to).map(|e| e.cost)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub(crate) fn insert_edge(&mut self, a: NodeKey, b: NodeKey, cost: f64, kind: EdgeKind) {
        if a == b {
            return;
        }
        match self.cost(a, b) {
            Some(existing) if cost < existing => {
                self.lower_cost(a, b, cost);
                self.lower_cost(b, a, cost);
            }
            Some(_) => {}
            None => {
                self.adjacency
                    .entry(a)
                    .or_default()
                    .push(Edge { to: b, cost, kind });
                self.adjacency
                    .entry(b)
                    .or_default()
                    .push(Edge { to: a, cost, kind });
                self.edge_count += 1;
            }
        }
    }

    fn lower_cost(&mut self, from: NodeKey, to: NodeKey, cost: f64) {
        if let Some(edge) = self
            .adjacency
            .get_mut(&from)
            .and_then(|edges| edges.iter_mut().find(|e| e.to == to))
        {
            edge.cost = cost;
        }
    }
}

/// Derives [`TransitGraph`]s from a network.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Build the graph for the routes `filter` allows.
    pub fn build(&self, network: &Network, filter: &RouteFilter) -> TransitGraph {
        let mut graph = TransitGraph::default();
        let half = self.config.transfer_half();
        let mut skipped = 0usize;

        for schedule in network.schedules() {
            let allowed = network
                .route(schedule.route)
                .is_some_and(|route| filter.allows(route));
            if !allowed {
                skipped += 1;
                continue;
            }

            for (from, to, mins) in schedule.segments() {
                graph.insert_edge(
                    NodeKey::route(from, schedule.route),
                    NodeKey::route(to, schedule.route),
                    mins,
                    EdgeKind::Ride,
                );
            }
            for &stop in &schedule.stops {
                graph.insert_edge(
                    NodeKey::hub(stop),
                    NodeKey::route(stop, schedule.route),
                    half,
                    EdgeKind::Transfer,
                );
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            skipped_schedules = skipped,
            "built transit graph"
        );
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeoPoint, Stop, StopId, TransportMode};
    use crate::graph::RouteSchedule;

    fn network(replacement: bool) -> Network {
        let stops = (1..=3)
            .map(|i| {
                Stop::new(
                    StopId::new(i),
                    format!("S{i}"),
                    GeoPoint::new(0.0, 0.0),
                    TransportMode::Train,
                )
            })
            .collect();
        let r1 = RouteId::new(1).unwrap();
        let r2 = RouteId::new(2).unwrap();
        let mut bus = Route::new(r2, "Replacement", TransportMode::Bus);
        bus.is_replacement = replacement;
        let routes = vec![Route::new(r1, "Line", TransportMode::Train), bus];
        let schedules = vec![
            RouteSchedule::new(r1, vec![StopId::new(1), StopId::new(2)], vec![4.0]),
            RouteSchedule::new(r2, vec![StopId::new(2), StopId::new(3)], vec![6.0]),
        ];
        Network::new(stops, routes, schedules).unwrap()
    }

    #[test]
    fn ride_and_transfer_edges() {
        let graph = GraphBuilder::new(GraphConfig::default()).build(&network(false), &RouteFilter::none());
        let r1 = RouteId::new(1).unwrap();
        let a = NodeKey::route(StopId::new(1), r1);
        let b = NodeKey::route(StopId::new(2), r1);

        assert_eq!(graph.cost(a, b), Some(4.0));
        assert_eq!(graph.cost(b, a), Some(4.0));
        assert_eq!(graph.cost(NodeKey::hub(StopId::new(1)), a), Some(2.5));
        assert_eq!(graph.cost(a, NodeKey::hub(StopId::new(1))), Some(2.5));

        // 3 hubs + 4 route nodes; 2 ride + 4 transfer edges
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn replacement_routes_filtered() {
        let builder = GraphBuilder::new(GraphConfig::default());
        let graph = builder.build(&network(true), &RouteFilter::without_replacements());

        assert!(!graph.contains(NodeKey::hub(StopId::new(3))));
        assert!(graph.contains(NodeKey::hub(StopId::new(2))));

        let graph = builder.build(&network(true), &RouteFilter::none());
        assert!(graph.contains(NodeKey::hub(StopId::new(3))));
    }

    #[test]
    fn explicit_exclusion() {
        let mut filter = RouteFilter::none();
        filter.excluded_routes.insert(RouteId::new(1).unwrap());
        let graph = GraphBuilder::new(GraphConfig::default()).build(&network(false), &filter);
        assert!(!graph.contains(NodeKey::hub(StopId::new(1))));
    }

    #[test]
    fn parallel_edges_keep_minimum() {
        let mut graph = TransitGraph::default();
        let a = NodeKey::hub(StopId::new(1));
        let b = NodeKey::hub(StopId::new(2));
        graph.insert_edge(a, b, 7.0, EdgeKind::Ride);
        graph.insert_edge(b, a, 3.0, EdgeKind::Ride);
        graph.insert_edge(a, b, 9.0, EdgeKind::Ride);

        assert_eq!(graph.cost(a, b), Some(3.0));
        assert_eq!(graph.cost(b, a), Some(3.0));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn custom_penalty() {
        let config = GraphConfig::new(8.0, 4);
        assert_eq!(config.transfer_half(), 4.0);
    }
}
