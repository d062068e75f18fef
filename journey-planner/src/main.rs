use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use journey_planner::cache::CachedLiveSource;
use journey_planner::config::{AppConfig, LiveMode};
use journey_planner::domain::StopId;
use journey_planner::engine::{PlanRequest, TripPlanner};
use journey_planner::enrich::Enricher;
use journey_planner::graph::{InMemoryNetworkStore, Network};
use journey_planner::live::{Guarded, LiveSource, MockLiveSource, PtvClient};
use journey_planner::planner::JourneySearch;
use journey_planner::ratelimit::RateLimiter;

/// plan a multi-leg public transport journey between two stops
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// stop id to depart from
    origin: u32,
    /// stop id to arrive at
    destination: u32,
    /// number of distinct itineraries to search for
    k: Option<usize>,
    /// departure time as RFC 3339, e.g. 2025-03-01T08:00:00Z. defaults to now.
    #[arg(value_parser = parse_time)]
    depart_at: Option<DateTime<Utc>>,
    /// leave replacement bus services out of the search
    #[arg(long)]
    exclude_replacements: bool,
    /// first departures tried per itinerary
    #[arg(long)]
    departures_per_leg: Option<usize>,
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid departure time {raw:?}: {e}"))
}

impl Args {
    fn request(&self) -> PlanRequest {
        let mut request = PlanRequest::new(StopId::new(self.origin), StopId::new(self.destination));
        if let Some(k) = self.k {
            request = request.with_k(k);
        }
        if let Some(time) = self.depart_at {
            request = request.departing_at(time);
        }
        if let Some(count) = self.departures_per_leg {
            request = request.with_departures_per_leg(count);
        }
        if self.exclude_replacements {
            request = request.excluding_replacements();
        }
        request
    }
}

fn load_network(path: &Path) -> Result<Network> {
    Network::load(path).with_context(|| format!("failed to load network from {}", path.display()))
}

async fn run<L: LiveSource>(
    config: &AppConfig,
    search: JourneySearch<InMemoryNetworkStore>,
    live: L,
    request: PlanRequest,
) -> Result<()> {
    let enricher = Enricher::new(Arc::new(live), config.enrich.clone());
    let planner = TripPlanner::new(search, enricher);

    let response = planner.plan(request).await.context("planning failed")?;
    if response.is_empty() {
        info!("no itinerary connects these stops");
    }
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let request = Args::parse().request();

    let config = AppConfig::from_env();
    let network = load_network(&config.network_path)?;
    let store = InMemoryNetworkStore::new(network, config.graph.clone());
    let search = JourneySearch::new(Arc::new(store), config.search.clone(), config.rules.clone());

    match &config.live {
        LiveMode::Api(live_config) => {
            let client = PtvClient::new(live_config).context("failed to build live API client")?;
            let limiter = Arc::new(RateLimiter::new(live_config.min_interval, live_config.burst));
            let guarded = Guarded::new(client, limiter, live_config.timeout);
            let cached = CachedLiveSource::new(guarded, &config.cache);
            run(&config, search, cached, request).await
        }
        LiveMode::Mock(path) => {
            let mock = MockLiveSource::load(path)
                .with_context(|| format!("failed to load mock live data from {}", path.display()))?;
            info!(path = %path.display(), "serving live data from mock file");
            run(&config, search, mock, request).await
        }
        LiveMode::Offline => run(&config, search, MockLiveSource::offline(), request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn positional_arguments_build_request() {
        let args = Args::try_parse_from(["journey-planner", "1071", "1181", "2", "2025-03-01T19:00:00+11:00"])
            .unwrap();
        let request = args.request();

        assert_eq!(request.origin, StopId::new(1071));
        assert_eq!(request.destination, StopId::new(1181));
        assert_eq!(request.k, Some(2));
        assert_eq!(
            request.depart_at,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap())
        );
        assert!(!request.exclude_replacement);
    }

    #[test]
    fn flags_reach_request() {
        let args = Args::try_parse_from([
            "journey-planner",
            "1",
            "2",
            "--exclude-replacements",
            "--departures-per-leg",
            "2",
        ])
        .unwrap();
        let request = args.request();

        assert!(request.exclude_replacement);
        assert_eq!(request.departures_per_leg, Some(2));
        assert_eq!(request.k, None);
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(Args::try_parse_from(["journey-planner", "1"]).is_err());
        assert!(Args::try_parse_from(["journey-planner", "one", "2"]).is_err());
        assert!(Args::try_parse_from(["journey-planner", "1", "2", "3", "tomorrow"]).is_err());
    }

    #[test]
    fn missing_network_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.json");

        let err = load_network(&path).unwrap_err();
        assert!(err.to_string().starts_with("failed to load network from"), "{err}");
        assert!(err.to_string().contains("network.json"), "{err}");
    }

    #[test]
    fn sample_network_loads() {
        assert!(load_network(Path::new("data/network.json")).is_ok());
    }
}
