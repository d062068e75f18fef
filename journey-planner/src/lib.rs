//! Multi-leg public transport journey planner.
//!
//! Answers: "how do I get from this stop to that one, and when do I
//! leave?" A k-shortest-paths search over the network graph finds a few
//! distinct itineraries; each is then timed with live departures, falling
//! back to estimates wherever live data is missing.

pub mod cache;
pub mod config;
pub mod domain;
pub mod engine;
pub mod enrich;
pub mod graph;
pub mod live;
pub mod planner;
pub mod ratelimit;
