//! Journey search.
//!
//! This module answers: "which distinct ways are there to get from stop A
//! to stop B?" It asks the network store for the k cheapest hub-to-hub
//! paths, turns them into itineraries of legs, enforces the boarding rules
//! for restricted routes and removes duplicates.

mod config;
mod rank;
mod rules;
mod search;

#[cfg(test)]
mod search_tests;

pub use config::SearchConfig;
pub use rank::deduplicate;
pub use rules::{BoardingRules, Violation};
pub use search::{JourneySearch, SearchError, SearchRequest, SearchResult};
