//! Shortest and k-shortest loopless paths.
//!
//! Dijkstra over a [`TransitGraph`] with optional banned nodes and edges,
//! and Yen's algorithm layered on top of it. Edges are traversed in both
//! directions.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::{NodeKey, TransitGraph};
use crate::domain::{RouteId, StopId};

/// One node of a path, unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathNode {
    pub key: NodeKey,
    pub stop: StopId,
    /// `None` for hub nodes.
    pub route: Option<RouteId>,
}

impl From<NodeKey> for PathNode {
    fn from(key: NodeKey) -> Self {
        Self {
            key,
            stop: key.stop(),
            route: key.route_id(),
        }
    }
}

/// A loopless path with per-edge costs.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPath {
    pub nodes: Vec<PathNode>,
    /// `edge_costs[i]` is the cost from `nodes[i]` to `nodes[i + 1]`.
    pub edge_costs: Vec<f64>,
    pub total: f64,
}

impl GraphPath {
    fn from_keys(keys: Vec<NodeKey>, edge_costs: Vec<f64>) -> Self {
        let total = edge_costs.iter().sum();
        Self {
            nodes: keys.into_iter().map(PathNode::from).collect(),
            edge_costs,
            total,
        }
    }

    fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes.iter().map(|n| n.key)
    }
}

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: NodeKey,
}

impl Eq for State {}

// Min-heap on cost; ties broken on node key so the order is total.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn edge_id(a: NodeKey, b: NodeKey) -> (NodeKey, NodeKey) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Exclusions for one Dijkstra run.
#[derive(Debug, Default)]
struct Bans {
    nodes: HashSet<NodeKey>,
    edges: HashSet<(NodeKey, NodeKey)>,
}

fn dijkstra(
    graph: &TransitGraph,
    source: NodeKey,
    target: NodeKey,
    bans: &Bans,
) -> Option<(Vec<NodeKey>, Vec<f64>)> {
    let mut dist: HashMap<NodeKey, f64> = HashMap::new();
    let mut predecessors: HashMap<NodeKey, (NodeKey, f64)> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(source, 0.0);
    heap.push(State {
        cost: 0.0,
        node: source,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if node == target {
            break;
        }
        if cost > *dist.get(&node).unwrap_or(&f64::INFINITY) {
            continue;
        }

        for edge in graph.edges(node) {
            if bans.nodes.contains(&edge.to) || bans.edges.contains(&edge_id(node, edge.to)) {
                continue;
            }
            let next = cost + edge.cost;
            if next < *dist.get(&edge.to).unwrap_or(&f64::INFINITY) {
                dist.insert(edge.to, next);
                predecessors.insert(edge.to, (node, edge.cost));
                heap.push(State {
                    cost: next,
                    node: edge.to,
                });
            }
        }
    }

    if !dist.contains_key(&target) {
        return None;
    }

    let mut keys = vec![target];
    let mut costs = Vec::new();
    let mut curr = target;
    while let Some(&(prev, cost)) = predecessors.get(&curr) {
        keys.push(prev);
        costs.push(cost);
        curr = prev;
    }
    keys.reverse();
    costs.reverse();
    Some((keys, costs))
}

/// Lowest-cost path between two nodes.
pub fn shortest_path(graph: &TransitGraph, source: NodeKey, target: NodeKey) -> Option<GraphPath> {
    if source == target || !graph.contains(source) || !graph.contains(target) {
        return None;
    }
    dijkstra(graph, source, target, &Bans::default())
        .map(|(keys, costs)| GraphPath::from_keys(keys, costs))
}

/// Up to `k` loopless paths in ascending cost order (Yen's algorithm).
///
/// Returns an empty list if the endpoints coincide, either is absent from
/// the graph, or they are not connected.
pub fn k_shortest_paths(
    graph: &TransitGraph,
    source: NodeKey,
    target: NodeKey,
    k: usize,
) -> Vec<GraphPath> {
    if k == 0 {
        return Vec::new();
    }
    let Some(first) = shortest_path(graph, source, target) else {
        return Vec::new();
    };

    let mut accepted = vec![first];
    let mut candidates: Vec<GraphPath> = Vec::new();

    while accepted.len() < k {
        let last = &accepted[accepted.len() - 1];
        let last_keys: Vec<NodeKey> = last.keys().collect();

        for i in 0..last_keys.len() - 1 {
            let spur = last_keys[i];
            let root = &last_keys[..=i];

            let mut bans = Bans::default();
            for path in &accepted {
                let keys: Vec<NodeKey> = path.keys().collect();
                if keys.len() > i + 1 && keys[..=i] == *root {
                    bans.edges.insert(edge_id(keys[i], keys[i + 1]));
                }
            }
            bans.nodes.extend(root[..i].iter().copied());

            let Some((spur_keys, spur_costs)) = dijkstra(graph, spur, target, &bans) else {
                continue;
            };

            let mut keys = root[..i].to_vec();
            keys.extend(spur_keys);
            let mut costs = last.edge_costs[..i].to_vec();
            costs.extend(spur_costs);
            let candidate = GraphPath::from_keys(keys, costs);

            let seen = accepted
                .iter()
                .chain(candidates.iter())
                .any(|p| p.nodes == candidate.nodes);
            if !seen {
                candidates.push(candidate);
            }
        }

        let best = candidates
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.total
                    .total_cmp(&b.total)
                    .then_with(|| a.nodes.len().cmp(&b.nodes.len()))
            })
            .map(|(idx, _)| idx);
        match best {
            Some(idx) => accepted.push(candidates.swap_remove(idx)),
            None => break,
        }
    }

    accepted
}
