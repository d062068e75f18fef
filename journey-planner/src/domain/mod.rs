//! Domain types for the journey planner.
//!
//! This module contains the core domain model: stops and routes from the
//! static network, and the legs, itineraries and timed variants built per
//! request. Types that carry invariants enforce them at construction
//! time, so code that receives them can trust their validity.

mod error;
mod ids;
mod itinerary;
mod leg;
mod mode;
mod route;
mod stop;
mod variant;

pub use error::DomainError;
pub use ids::{InvalidRouteId, MAX_ROUTE_ID, RouteId, StopId};
pub use itinerary::Itinerary;
pub use leg::Leg;
pub use mode::{InvalidMode, TransportMode};
pub use route::{Route, RouteSummary};
pub use stop::{GeoPoint, Stop};
pub use variant::{ItineraryVariant, Tier, TimedLeg};
