//! Rate limiting and deadlines for a live source.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::{DepartureQuery, LiveDeparture, LiveError, LiveSource, PatternCall};
use crate::domain::TransportMode;
use crate::ratelimit::RateLimiter;

/// Wraps a [`LiveSource`] so every call first takes a token from a shared
/// limiter and then runs under a deadline.
///
/// Time spent waiting for a token does not count against the deadline.
#[derive(Debug)]
pub struct Guarded<S> {
    inner: S,
    limiter: Arc<RateLimiter>,
    timeout: Duration,
}

impl<S> Guarded<S> {
    pub fn new(inner: S, limiter: Arc<RateLimiter>, timeout: Duration) -> Self {
        Self {
            inner,
            limiter,
            timeout,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }
}

impl<S: LiveSource> LiveSource for Guarded<S> {
    async fn departures(&self, query: &DepartureQuery) -> Result<Vec<LiveDeparture>, LiveError> {
        self.limiter.acquire().await;
        match tokio::time::timeout(self.timeout, self.inner.departures(query)).await {
            Ok(result) => result,
            Err(_) => {
                debug!(stop = %query.stop, "departures call timed out");
                Err(LiveError::Timeout)
            }
        }
    }

    async fn pattern(
        &self,
        run_ref: &str,
        mode: TransportMode,
    ) -> Result<Vec<PatternCall>, LiveError> {
        self.limiter.acquire().await;
        match tokio::time::timeout(self.timeout, self.inner.pattern(run_ref, mode)).await {
            Ok(result) => result,
            Err(_) => {
                debug!(run_ref, "pattern call timed out");
                Err(LiveError::Timeout)
            }
        }
    }
}
