//! Application configuration.
//!
//! Read from the environment:
//!
//! - `NETWORK_PATH`: network JSON file (default `data/network.json`)
//! - `PTV_DEV_ID`, `PTV_API_KEY`: live API credentials
//! - `PTV_BASE_URL`: live API base URL override
//! - `MOCK_LIVE_PATH`: serve live data from a JSON file instead of the API
//!
//! Without credentials or mock data the planner runs offline and every
//! leg is timed from estimates.

use std::path::PathBuf;

use tracing::warn;

use crate::cache::CacheConfig;
use crate::enrich::EnrichConfig;
use crate::graph::GraphConfig;
use crate::live::LiveConfig;
use crate::planner::{BoardingRules, SearchConfig};

/// Network file used when `NETWORK_PATH` is unset.
pub const DEFAULT_NETWORK_PATH: &str = "data/network.json";

/// Where live departures come from.
#[derive(Debug, Clone)]
pub enum LiveMode {
    /// The timetable API.
    Api(LiveConfig),
    /// A mock data file.
    Mock(PathBuf),
    /// No live data at all.
    Offline,
}

/// Everything needed to assemble a planner.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub network_path: PathBuf,
    pub live: LiveMode,
    pub graph: GraphConfig,
    pub search: SearchConfig,
    pub rules: BoardingRules,
    pub enrich: EnrichConfig,
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let network_path = var("NETWORK_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_NETWORK_PATH));

        let live = if let Some(path) = var("MOCK_LIVE_PATH") {
            LiveMode::Mock(PathBuf::from(path))
        } else {
            match (var("PTV_DEV_ID"), var("PTV_API_KEY")) {
                (Some(dev_id), Some(api_key)) => {
                    let mut config = LiveConfig::new(dev_id, api_key);
                    if let Some(url) = var("PTV_BASE_URL") {
                        config = config.with_base_url(url);
                    }
                    LiveMode::Api(config)
                }
                _ => {
                    warn!("PTV_DEV_ID or PTV_API_KEY not set; live times will be estimated");
                    LiveMode::Offline
                }
            }
        };

        Self {
            network_path,
            live,
            graph: GraphConfig::default(),
            search: SearchConfig::default(),
            rules: BoardingRules::default(),
            enrich: EnrichConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}
