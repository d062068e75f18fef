//! Caching layer for live source responses.
//!
//! Departure boards are cached by (mode, stop, route, result count, time
//! bucket). The `after` time of a query is floored to its bucket before it
//! goes out, so one cached board is valid for every query in that bucket.
//! Run patterns are cached by run reference.
//!
//! Failed calls are never cached.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::{StopId, TransportMode};
use crate::live::{DepartureQuery, LiveDeparture, LiveError, LiveSource, PatternCall};

/// Cache key for departure boards.
type BoardKey = (TransportMode, StopId, Option<u32>, usize, Option<i64>);

/// Cache key for run patterns.
type PatternKey = (String, TransportMode);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per kind.
    pub max_capacity: u64,

    /// Time bucket size in minutes.
    pub bucket_mins: u16,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
            bucket_mins: 1,
        }
    }
}

/// A [`LiveSource`] that caches another.
pub struct CachedLiveSource<S> {
    inner: S,
    boards: MokaCache<BoardKey, Arc<Vec<LiveDeparture>>>,
    patterns: MokaCache<PatternKey, Arc<Vec<PatternCall>>>,
    bucket_secs: i64,
}

impl<S> CachedLiveSource<S> {
    /// Create a new cached source.
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        let boards = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let patterns = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            boards,
            patterns,
            bucket_secs: i64::from(config.bucket_mins.max(1)) * 60,
        }
    }

    /// Start of the bucket containing `time`.
    fn bucket_start(&self, time: DateTime<Utc>) -> DateTime<Utc> {
        let secs = time.timestamp();
        let floored = secs - secs.rem_euclid(self.bucket_secs);
        DateTime::from_timestamp(floored, 0).unwrap_or(time)
    }

    /// The query actually sent, with `after` floored to its bucket.
    fn bucketed(&self, query: &DepartureQuery) -> DepartureQuery {
        DepartureQuery {
            after: query.after.map(|t| self.bucket_start(t)),
            ..query.clone()
        }
    }

    fn board_key(query: &DepartureQuery) -> BoardKey {
        (
            query.mode,
            query.stop,
            query.route,
            query.max_results,
            query.after.map(|t| t.timestamp()),
        )
    }

    /// Access the underlying source for calls that bypass the cache.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Get cache statistics (boards, patterns).
    pub fn entry_count(&self) -> (u64, u64) {
        (self.boards.entry_count(), self.patterns.entry_count())
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.boards.invalidate_all();
        self.patterns.invalidate_all();
    }
}

impl<S: LiveSource> LiveSource for CachedLiveSource<S> {
    async fn departures(&self, query: &DepartureQuery) -> Result<Vec<LiveDeparture>, LiveError> {
        let query = self.bucketed(query);
        let key = Self::board_key(&query);

        if let Some(cached) = self.boards.get(&key).await {
            trace!(stop = %query.stop, "board cache hit");
            return Ok(cached.as_ref().clone());
        }

        let board = self.inner.departures(&query).await?;
        self.boards.insert(key, Arc::new(board.clone())).await;
        Ok(board)
    }

    async fn pattern(
        &self,
        run_ref: &str,
        mode: TransportMode,
    ) -> Result<Vec<PatternCall>, LiveError> {
        let key = (run_ref.to_string(), mode);

        if let Some(cached) = self.patterns.get(&key).await {
            trace!(run_ref, "pattern cache hit");
            return Ok(cached.as_ref().clone());
        }

        let calls = self.inner.pattern(run_ref, mode).await?;
        self.patterns.insert(key, Arc::new(calls.clone())).await;
        Ok(calls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::MockLiveSource;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, h, m, s).unwrap()
    }

    fn query(stop: u32) -> DepartureQuery {
        DepartureQuery::new(TransportMode::Train, StopId::new(stop), 10)
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_capacity, 1000);
        assert_eq!(config.bucket_mins, 1);
    }

    #[test]
    fn bucket_calculation() {
        let config = CacheConfig {
            bucket_mins: 5,
            ..CacheConfig::default()
        };
        let cache = CachedLiveSource::new(MockLiveSource::new(), &config);

        assert_eq!(cache.bucket_start(at(10, 0, 0)), at(10, 0, 0));
        assert_eq!(cache.bucket_start(at(10, 4, 59)), at(10, 0, 0));
        assert_eq!(cache.bucket_start(at(10, 5, 0)), at(10, 5, 0));
    }

    #[tokio::test]
    async fn repeated_board_served_from_cache() {
        let cache = CachedLiveSource::new(MockLiveSource::new(), &CacheConfig::default());

        cache.departures(&query(1)).await.unwrap();
        cache.departures(&query(1)).await.unwrap();
        assert_eq!(cache.inner().departure_calls(), 1);

        cache.departures(&query(2)).await.unwrap();
        assert_eq!(cache.inner().departure_calls(), 2);

        cache.departures(&query(1).on_route(6)).await.unwrap();
        assert_eq!(cache.inner().departure_calls(), 3);
    }

    #[tokio::test]
    async fn after_is_bucketed() {
        let cache = CachedLiveSource::new(MockLiveSource::new(), &CacheConfig::default());

        cache.departures(&query(1).after(at(8, 0, 10))).await.unwrap();
        cache.departures(&query(1).after(at(8, 0, 50))).await.unwrap();
        assert_eq!(cache.inner().departure_calls(), 1);

        cache.departures(&query(1).after(at(8, 1, 0))).await.unwrap();
        assert_eq!(cache.inner().departure_calls(), 2);
    }

    #[tokio::test]
    async fn failures_not_cached() {
        let cache = CachedLiveSource::new(MockLiveSource::offline(), &CacheConfig::default());

        assert!(cache.departures(&query(1)).await.is_err());
        assert!(cache.departures(&query(1)).await.is_err());
        assert_eq!(cache.inner().departure_calls(), 2);
    }

    #[tokio::test]
    async fn patterns_cached_by_run() {
        let mock = MockLiveSource::new();
        mock.insert_pattern("r1", vec![]).await;
        let cache = CachedLiveSource::new(mock, &CacheConfig::default());

        cache.pattern("r1", TransportMode::Tram).await.unwrap();
        cache.pattern("r1", TransportMode::Tram).await.unwrap();
        assert_eq!(cache.inner().pattern_calls(), 1);

        cache.invalidate_all();
        cache.pattern("r1", TransportMode::Tram).await.unwrap();
        assert_eq!(cache.inner().pattern_calls(), 2);
    }
}
