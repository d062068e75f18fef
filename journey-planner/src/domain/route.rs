//! Routes and their display metadata.

use serde::{Deserialize, Serialize};

use super::{RouteId, TransportMode};

/// A route in the static network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    #[serde(default)]
    pub number: Option<String>,
    pub mode: TransportMode,
    /// Identifier of the route in the GTFS feed (e.g. `"3-59"` for tram 59).
    #[serde(default)]
    pub gtfs_id: String,
    /// Identifier used by the live departures API, when known.
    #[serde(default)]
    pub external_id: Option<u32>,
    /// Replacement services (e.g. rail replacement buses) can be excluded per request.
    #[serde(default)]
    pub is_replacement: bool,
    #[serde(default)]
    pub colour: Option<[u8; 3]>,
}

impl Route {
    /// Create a route with no GTFS id, external id or colour.
    pub fn new(id: RouteId, name: impl Into<String>, mode: TransportMode) -> Self {
        Self {
            id,
            name: name.into(),
            number: None,
            mode,
            gtfs_id: String::new(),
            external_id: None,
            is_replacement: false,
            colour: None,
        }
    }

    /// Resolve the route id used to match live departures.
    ///
    /// An explicit external id always wins. Otherwise train routes use
    /// their base id, trams the number in a `3-NN` GTFS id, and buses a
    /// purely numeric GTFS id. Regional routes have no derivable id.
    ///
    /// # Examples
    ///
    /// ```
    /// use journey_planner::domain::{Route, RouteId, TransportMode};
    ///
    /// let mut tram = Route::new(RouteId::new(7_59).unwrap(), "Route 59", TransportMode::Tram);
    /// tram.gtfs_id = "3-59".into();
    /// assert_eq!(tram.live_route_id(), Some(59));
    ///
    /// let train = Route::new(RouteId::new(14_002).unwrap(), "Sandringham", TransportMode::Train);
    /// assert_eq!(train.live_route_id(), Some(14));
    /// ```
    pub fn live_route_id(&self) -> Option<u32> {
        if let Some(id) = self.external_id {
            return Some(id);
        }
        match self.mode {
            TransportMode::Train => Some(self.id.normalized().get()),
            TransportMode::Tram => self
                .gtfs_id
                .strip_prefix("3-")
                .unwrap_or(&self.gtfs_id)
                .trim_end_matches(':')
                .parse()
                .ok(),
            TransportMode::Bus | TransportMode::NightBus => {
                self.gtfs_id.trim_end_matches(':').parse().ok()
            }
            TransportMode::Regional => None,
        }
    }

    /// Returns the route colour, falling back to the mode default.
    pub fn display_colour(&self) -> [u8; 3] {
        self.colour.unwrap_or_else(|| self.mode.default_colour())
    }

    /// Snapshot of the metadata a leg carries for rendering.
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            id: self.id,
            name: self.name.clone(),
            number: self.number.clone(),
            mode: self.mode,
            colour: self.display_colour(),
            live_id: self.live_route_id(),
        }
    }
}

/// Route display metadata copied onto each leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub id: RouteId,
    pub name: String,
    pub number: Option<String>,
    pub mode: TransportMode,
    pub colour: [u8; 3],
    /// Route id in the live departures API, if resolvable.
    #[serde(skip)]
    pub live_id: Option<u32>,
}
