//! Network store abstraction.
//!
//! The journey search only talks to the network through [`NetworkStore`]:
//! a k-shortest-paths query over a filtered edge set plus static lookups.
//! [`InMemoryNetworkStore`] answers it from a loaded [`Network`], caching
//! one built graph per distinct [`RouteFilter`].

use std::sync::Arc;

use moka::sync::Cache;
use tracing::debug;

use super::{GraphBuilder, GraphConfig, GraphError, GraphPath, Network, NodeKey};
use super::{RouteFilter, TransitGraph, k_shortest_paths};
use crate::domain::{GeoPoint, Route, RouteId, Stop, StopId};

/// Source of network structure for the journey search.
pub trait NetworkStore: Send + Sync {
    /// Up to `k` lowest-cost paths between two node keys, cheapest first.
    ///
    /// # Errors
    ///
    /// Returns `Err` only if the store itself cannot be queried. No path
    /// is an empty list.
    fn k_shortest_paths(
        &self,
        from: NodeKey,
        to: NodeKey,
        k: usize,
        filter: &RouteFilter,
    ) -> Result<Vec<GraphPath>, GraphError>;

    fn stop(&self, id: StopId) -> Option<&Stop>;

    fn route(&self, id: RouteId) -> Option<&Route>;

    /// Polyline of `route` between two of its stops; empty if unknown.
    fn segment_geometry(&self, route: RouteId, from: StopId, to: StopId) -> Vec<GeoPoint>;

    /// Full transfer penalty in minutes.
    fn transfer_penalty(&self) -> f64;
}

/// [`NetworkStore`] backed by an in-memory [`Network`].
pub struct InMemoryNetworkStore {
    network: Arc<Network>,
    builder: GraphBuilder,
    graphs: Cache<RouteFilter, Arc<TransitGraph>>,
}

impl InMemoryNetworkStore {
    pub fn new(network: Network, config: GraphConfig) -> Self {
        let graphs = Cache::builder()
            .max_capacity(config.cache_capacity)
            .build();
        Self {
            network: Arc::new(network),
            builder: GraphBuilder::new(config),
            graphs,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Graph for `filter`, building it on first use.
    pub fn graph(&self, filter: &RouteFilter) -> Arc<TransitGraph> {
        self.graphs.get_with(filter.clone(), || {
            debug!(?filter, "building graph for filter");
            Arc::new(self.builder.build(&self.network, filter))
        })
    }
}

impl NetworkStore for InMemoryNetworkStore {
    fn k_shortest_paths(
        &self,
        from: NodeKey,
        to: NodeKey,
        k: usize,
        filter: &RouteFilter,
    ) -> Result<Vec<GraphPath>, GraphError> {
        let graph = self.graph(filter);
        Ok(k_shortest_paths(&graph, from, to, k))
    }

    fn stop(&self, id: StopId) -> Option<&Stop> {
        self.network.stop(id)
    }

    fn route(&self, id: RouteId) -> Option<&Route> {
        self.network.route(id)
    }

    fn segment_geometry(&self, route: RouteId, from: StopId, to: StopId) -> Vec<GeoPoint> {
        self.network.segment_geometry(route, from, to)
    }

    fn transfer_penalty(&self) -> f64 {
        self.builder.config().transfer_penalty_mins
    }
}
