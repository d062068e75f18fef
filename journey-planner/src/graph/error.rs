//! Network store error types.

use std::path::PathBuf;

use crate::domain::{RouteId, StopId};

/// The network store cannot be read or holds inconsistent data.
///
/// Any of these is fatal to a planning request.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Network file could not be read
    #[error("failed to read network from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Network data is not valid JSON for the expected shape
    #[error("malformed network data: {0}")]
    Json(#[from] serde_json::Error),

    /// A schedule references a route that is not defined
    #[error("schedule references unknown route {0}")]
    UnknownRoute(RouteId),

    /// A schedule references a stop that is not defined
    #[error("route {route} references unknown stop {stop}")]
    UnknownStop { route: RouteId, stop: StopId },

    /// Stop or route defined twice
    #[error("duplicate {kind} id {id}")]
    Duplicate { kind: &'static str, id: u32 },

    /// Schedule arrays disagree in length or carry bad costs
    #[error("invalid schedule for route {route}: {reason}")]
    InvalidSchedule {
        route: RouteId,
        reason: &'static str,
    },

    /// Backend could not answer the query
    #[error("network store unavailable: {0}")]
    Unavailable(String),
}
