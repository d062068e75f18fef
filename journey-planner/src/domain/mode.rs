//! Transport mode type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when converting an unknown route type code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown route type: {0}")]
pub struct InvalidMode(pub i32);

/// The kind of service a route or stop belongs to.
///
/// The numeric route type codes are the ones used by the live timetable
/// API (`0` train, `1` tram, `2` bus, `3` regional, `4` night bus).
///
/// # Examples
///
/// ```
/// use journey_planner::domain::TransportMode;
///
/// let mode = TransportMode::from_route_type(3).unwrap();
/// assert_eq!(mode, TransportMode::Regional);
/// assert_eq!(mode.route_type(), 3);
///
/// assert!(TransportMode::from_route_type(9).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Train,
    Tram,
    Bus,
    Regional,
    NightBus,
}

impl TransportMode {
    /// Convert a route type code into a mode.
    pub fn from_route_type(code: i32) -> Result<Self, InvalidMode> {
        match code {
            0 => Ok(TransportMode::Train),
            1 => Ok(TransportMode::Tram),
            2 => Ok(TransportMode::Bus),
            3 => Ok(TransportMode::Regional),
            4 => Ok(TransportMode::NightBus),
            other => Err(InvalidMode(other)),
        }
    }

    /// Returns the route type code used in live API paths.
    pub fn route_type(self) -> i32 {
        match self {
            TransportMode::Train => 0,
            TransportMode::Tram => 1,
            TransportMode::Bus => 2,
            TransportMode::Regional => 3,
            TransportMode::NightBus => 4,
        }
    }

    /// Display colour used when a route has none of its own.
    pub fn default_colour(self) -> [u8; 3] {
        match self {
            TransportMode::Train => [0, 114, 206],
            TransportMode::Tram => [120, 190, 32],
            TransportMode::Bus => [255, 130, 0],
            TransportMode::Regional => [140, 25, 135],
            TransportMode::NightBus => [255, 130, 0],
        }
    }

    /// Returns a human-readable name.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Train => "train",
            TransportMode::Tram => "tram",
            TransportMode::Bus => "bus",
            TransportMode::Regional => "regional",
            TransportMode::NightBus => "night bus",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
