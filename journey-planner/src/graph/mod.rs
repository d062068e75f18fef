//! Transit network graph.
//!
//! The network is modelled as an undirected weighted graph with two kinds
//! of node per stop: a route node for every route serving it, and a single
//! hub node. Ride edges join consecutive stops on a route; transfer edges
//! join a hub to its route nodes. Journeys are searched hub to hub.

mod builder;
mod error;
mod ksp;
mod network;
mod node;
mod store;

pub use builder::{Edge, EdgeKind, GraphBuilder, GraphConfig, RouteFilter, TransitGraph};
pub use error::GraphError;
pub use ksp::{GraphPath, PathNode, k_shortest_paths, shortest_path};
pub use network::{Network, RouteSchedule};
pub use node::NodeKey;
pub use store::{InMemoryNetworkStore, NetworkStore};
