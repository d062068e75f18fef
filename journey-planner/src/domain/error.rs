//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They
//! are distinct from graph, live API and IO errors.

use super::StopId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Itinerary has no legs
    #[error("itinerary must have at least one leg")]
    EmptyItinerary,

    /// Consecutive legs don't share a stop
    #[error("legs are not connected: {0} then {1}")]
    LegsNotConnected(StopId, StopId),

    /// Leg boards and alights at the same stop
    #[error("leg boards and alights at stop {0}")]
    DegenerateLeg(StopId),

    /// Timed itinerary has no legs
    #[error("variant must have at least one timed leg")]
    EmptyVariant,
}
