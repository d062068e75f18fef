//! Stops and coordinates.

use serde::{Deserialize, Serialize};

use super::{StopId, TransportMode};

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A stop in the static network.
///
/// Reference data: created by the ingestion job, read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub location: GeoPoint,
    pub mode: TransportMode,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub landmark: Option<String>,
}

impl Stop {
    /// Create a stop with no suburb or landmark metadata.
    pub fn new(id: StopId, name: impl Into<String>, location: GeoPoint, mode: TransportMode) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            mode,
            suburb: None,
            landmark: None,
        }
    }
}
