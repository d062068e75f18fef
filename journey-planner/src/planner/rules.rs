//! Boarding rules for restricted routes.
//!
//! Long-haul regional services may only be boarded or alighted at a small
//! set of interchange stations. Station identity is matched on display
//! names: a stop is blocked if its name matches a blocked token and no
//! allowed token. Matching is case-insensitive containment either way
//! round, so "Caulfield Station" and "Caulfield" match each other.
//!
//! Name matching is fragile (similar names collide) but it is what the
//! station list is keyed on today.

use crate::domain::{Itinerary, RouteId, StopId, TransportMode};
use crate::graph::NetworkStore;

const ALLOWED_STATIONS: &[&str] = &["Southern Cross", "Flinders Street", "Pakenham", "Sunbury"];

const BLOCKED_STATIONS: &[&str] = &[
    "Caulfield",
    "Footscray",
    "Sunshine",
    "Dandenong",
    "Clayton",
    "Oakleigh",
    "South Yarra",
    "Richmond",
    "Camberwell",
    "Box Hill",
    "Ringwood",
    "North Melbourne",
    "South Kensington",
    "Seddon",
    "Yarraville",
    "Newport",
    "Laverton",
    "Werribee",
    "Tarneit",
    "Wyndham Vale",
    "Little River",
    "Broadmeadows",
    "Craigieburn",
    "Essendon",
    "Moonee Ponds",
    "Watergardens",
];

/// Where restricted routes may stop for passengers.
#[derive(Debug, Clone)]
pub struct BoardingRules {
    /// Modes the rules apply to.
    pub restricted_modes: Vec<TransportMode>,
    /// Interchange stations where boarding is always allowed.
    pub allowed_stations: Vec<String>,
    /// Stations where boarding is refused unless also allowed.
    pub blocked_stations: Vec<String>,
}

impl Default for BoardingRules {
    fn default() -> Self {
        Self {
            restricted_modes: vec![TransportMode::Regional],
            allowed_stations: ALLOWED_STATIONS.iter().map(|s| s.to_string()).collect(),
            blocked_stations: BLOCKED_STATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A restricted route boarded or alighted at a blocked stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub route: RouteId,
    pub stop: StopId,
    pub stop_name: String,
}

fn matches(name: &str, token: &str) -> bool {
    let token = token.trim().to_lowercase();
    if token.is_empty() {
        return false;
    }
    let name = name.to_lowercase();
    name.contains(&token) || token.contains(&name)
}

impl BoardingRules {
    /// Rules that never reject anything.
    pub fn permissive() -> Self {
        Self {
            restricted_modes: Vec::new(),
            allowed_stations: Vec::new(),
            blocked_stations: Vec::new(),
        }
    }

    pub fn applies_to(&self, mode: TransportMode) -> bool {
        self.restricted_modes.contains(&mode)
    }

    /// True if a restricted route may not stop at a station named `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use journey_planner::planner::BoardingRules;
    ///
    /// let rules = BoardingRules::default();
    /// assert!(rules.is_blocked("Footscray Station"));
    /// assert!(!rules.is_blocked("Southern Cross Station"));
    /// assert!(!rules.is_blocked("Geelong Station"));
    /// ```
    pub fn is_blocked(&self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.blocked_stations.iter().any(|t| matches(name, t))
            && !self.allowed_stations.iter().any(|t| matches(name, t))
    }

    /// First restricted leg endpoint at a blocked stop, if any.
    ///
    /// Stops the store doesn't know are never blocked.
    pub fn violation<S: NetworkStore + ?Sized>(
        &self,
        itinerary: &Itinerary,
        store: &S,
    ) -> Option<Violation> {
        itinerary
            .legs()
            .iter()
            .filter(|leg| self.applies_to(leg.route().mode))
            .flat_map(|leg| [(leg, leg.origin()), (leg, leg.destination())])
            .find_map(|(leg, stop_id)| {
                let stop = store.stop(stop_id)?;
                self.is_blocked(&stop.name).then(|| Violation {
                    route: leg.route().id,
                    stop: stop_id,
                    stop_name: stop.name.clone(),
                })
            })
    }
}
