//! Stop and route identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Route ids at or above this value cannot be packed into a graph node key.
pub const MAX_ROUTE_ID: u32 = 999_999_999;

/// Expanded route patterns are numbered `base * 1000 + pattern_index`.
const PATTERN_STRIDE: u32 = 1000;

/// Error returned when constructing an invalid route id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route id {value}: {reason}")]
pub struct InvalidRouteId {
    value: u32,
    reason: &'static str,
}

/// Identifier of a stop in the static network.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(u32);

impl StopId {
    /// Wrap a raw stop id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a route (or of one expanded pattern of a route).
///
/// Zero is reserved for hub nodes in the network graph, so a `RouteId`
/// is always in `1..=MAX_ROUTE_ID`.
///
/// # Examples
///
/// ```
/// use journey_planner::domain::RouteId;
///
/// let pattern = RouteId::new(14_002).unwrap();
/// assert_eq!(pattern.normalized(), RouteId::new(14).unwrap());
///
/// assert!(RouteId::new(0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RouteId(u32);

impl RouteId {
    /// Construct a route id, rejecting the hub sentinel and oversized values.
    pub fn new(id: u32) -> Result<Self, InvalidRouteId> {
        if id == 0 {
            return Err(InvalidRouteId {
                value: id,
                reason: "zero is reserved for hub nodes",
            });
        }
        if id > MAX_ROUTE_ID {
            return Err(InvalidRouteId {
                value: id,
                reason: "must be below 1e9",
            });
        }
        Ok(Self(id))
    }

    /// Returns the raw id.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// True if this id names one expanded pattern of a base route.
    pub fn is_pattern(self) -> bool {
        (PATTERN_STRIDE..100 * PATTERN_STRIDE).contains(&self.0)
    }

    /// Collapse an expanded-pattern id back to its base route.
    ///
    /// Ids outside the pattern range are returned unchanged.
    pub fn normalized(self) -> RouteId {
        if self.is_pattern() {
            RouteId(self.0 / PATTERN_STRIDE)
        } else {
            self
        }
    }
}

impl TryFrom<u32> for RouteId {
    type Error = InvalidRouteId;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        RouteId::new(value)
    }
}

impl From<RouteId> for u32 {
    fn from(id: RouteId) -> Self {
        id.0
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
