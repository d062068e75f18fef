//! Mock live source for testing without API access.
//!
//! Serves departures and run patterns from memory or a JSON file, and can be
//! forced offline, slow or malformed to exercise the fallback tiers.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{DepartureQuery, LiveDeparture, LiveError, LiveSource, PatternCall};
use crate::domain::TransportMode;

/// Data served by a [`MockLiveSource`].
///
/// The JSON form is `{"departures": [...], "patterns": {"<run_ref>": [...]}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockData {
    #[serde(default)]
    pub departures: Vec<LiveDeparture>,
    #[serde(default)]
    pub patterns: HashMap<String, Vec<PatternCall>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behaviour {
    Normal,
    Offline,
    Malformed,
}

/// Mock live source.
#[derive(Debug, Clone)]
pub struct MockLiveSource {
    data: Arc<RwLock<MockData>>,
    behaviour: Behaviour,
    delay: Option<Duration>,
    departure_calls: Arc<AtomicUsize>,
    pattern_calls: Arc<AtomicUsize>,
}

impl Default for MockLiveSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLiveSource {
    /// A source with no data: every board is empty.
    pub fn new() -> Self {
        Self::from_data(MockData::default())
    }

    pub fn from_data(data: MockData) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
            behaviour: Behaviour::Normal,
            delay: None,
            departure_calls: Arc::new(AtomicUsize::new(0)),
            pattern_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source that fails every call.
    pub fn offline() -> Self {
        Self {
            behaviour: Behaviour::Offline,
            ..Self::new()
        }
    }

    /// A source whose every payload fails to parse.
    pub fn malformed() -> Self {
        Self {
            behaviour: Behaviour::Malformed,
            ..Self::new()
        }
    }

    /// Delay every call by `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Load mock data from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LiveError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LiveError::NotConfigured(format!("failed to read mock data {path:?}: {e}"))
        })?;
        let data: MockData = serde_json::from_str(&json)?;
        Ok(Self::from_data(data))
    }

    pub async fn insert_departure(&self, departure: LiveDeparture) {
        self.data.write().await.departures.push(departure);
    }

    pub async fn insert_pattern(&self, run_ref: impl Into<String>, calls: Vec<PatternCall>) {
        self.data.write().await.patterns.insert(run_ref.into(), calls);
    }

    /// Total calls made, of either kind.
    pub fn call_count(&self) -> usize {
        self.departure_calls() + self.pattern_calls()
    }

    pub fn departure_calls(&self) -> usize {
        self.departure_calls.load(Ordering::SeqCst)
    }

    pub fn pattern_calls(&self) -> usize {
        self.pattern_calls.load(Ordering::SeqCst)
    }

    async fn misbehave(&self) -> Result<(), LiveError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.behaviour {
            Behaviour::Normal => Ok(()),
            Behaviour::Offline => Err(LiveError::Unavailable("mock source offline".to_string())),
            Behaviour::Malformed => Err(LiveError::Json {
                message: "expected value at line 1 column 1".to_string(),
                body: Some("<html>".to_string()),
            }),
        }
    }
}

impl LiveSource for MockLiveSource {
    async fn departures(&self, query: &DepartureQuery) -> Result<Vec<LiveDeparture>, LiveError> {
        self.departure_calls.fetch_add(1, Ordering::SeqCst);
        self.misbehave().await?;

        let data = self.data.read().await;
        let mut board: Vec<LiveDeparture> = data
            .departures
            .iter()
            .filter(|d| d.stop == query.stop)
            .filter(|d| query.route.is_none_or(|r| d.route_id == r))
            .filter(|d| match (query.after, d.time()) {
                (Some(after), Some(time)) => time >= after,
                _ => true,
            })
            .cloned()
            .collect();
        board.sort_by_key(|d| d.time());
        board.truncate(query.max_results);
        Ok(board)
    }

    async fn pattern(
        &self,
        run_ref: &str,
        _mode: TransportMode,
    ) -> Result<Vec<PatternCall>, LiveError> {
        self.pattern_calls.fetch_add(1, Ordering::SeqCst);
        self.misbehave().await?;

        let data = self.data.read().await;
        data.patterns
            .get(run_ref)
            .cloned()
            .ok_or_else(|| LiveError::Api {
                status: 404,
                message: format!("no mock pattern for run {run_ref}"),
            })
    }
}
