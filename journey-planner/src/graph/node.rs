//! Graph node identity.
//!
//! Every node is addressed by a single `u64` packing the stop and the
//! route it was reached on: `stop * 1e9 + route`. Route `0` is reserved
//! for the mode-agnostic hub node of a stop.

use std::fmt;

use crate::domain::{RouteId, StopId};

const STRIDE: u64 = 1_000_000_000;

/// Packed `(stop, route)` node key.
///
/// # Examples
///
/// ```
/// use journey_planner::domain::{RouteId, StopId};
/// use journey_planner::graph::NodeKey;
///
/// let route = RouteId::new(6).unwrap();
/// let key = NodeKey::route(StopId::new(1071), route);
/// assert_eq!(key.get(), 1_071_000_000_006);
/// assert_eq!(key.stop(), StopId::new(1071));
/// assert_eq!(key.route_id(), Some(route));
///
/// let hub = NodeKey::hub(StopId::new(1071));
/// assert!(hub.is_hub());
/// assert_eq!(hub.route_id(), None);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(u64);

impl NodeKey {
    /// Hub node of a stop.
    pub fn hub(stop: StopId) -> Self {
        Self(u64::from(stop.get()) * STRIDE)
    }

    /// Node for a stop as reached on `route`.
    pub fn route(stop: StopId, route: RouteId) -> Self {
        Self(u64::from(stop.get()) * STRIDE + u64::from(route.get()))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn stop(self) -> StopId {
        // stop ids are u32, so the quotient always fits
        StopId::new((self.0 / STRIDE) as u32)
    }

    /// Route component, or `None` for a hub.
    pub fn route_id(self) -> Option<RouteId> {
        RouteId::new((self.0 % STRIDE) as u32).ok()
    }

    pub fn is_hub(self) -> bool {
        self.0 % STRIDE == 0
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.route_id() {
            Some(route) => write!(f, "Node({}@{})", self.stop(), route),
            None => write!(f, "Hub({})", self.stop()),
        }
    }
}
