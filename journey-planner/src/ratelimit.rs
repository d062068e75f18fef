//! Shared rate limiter for outbound calls.
//!
//! A token bucket: up to `burst` calls may go out back to back, after which
//! one token is refilled every `min_interval`. Callers wait on
//! [`RateLimiter::acquire`]; they never wait on each other's work.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// Token bucket rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    bucket: Mutex<Bucket>,
    capacity: u32,
    interval: Duration,
}

#[derive(Debug)]
struct Bucket {
    tokens: u32,
    last_refill: Instant,
}

impl Bucket {
    fn refill(&mut self, now: Instant, interval: Duration, capacity: u32) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        let earned = u32::try_from(elapsed.as_nanos() / interval.as_nanos()).unwrap_or(u32::MAX);
        if earned == 0 {
            return;
        }
        self.tokens = self.tokens.saturating_add(earned).min(capacity);
        if self.tokens == capacity {
            self.last_refill = now;
        } else {
            self.last_refill += interval * earned;
        }
    }
}

impl RateLimiter {
    /// Create a limiter allowing `burst` immediate calls, then one per `min_interval`.
    pub fn new(min_interval: Duration, burst: u32) -> Self {
        let capacity = burst.max(1);
        Self {
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
            capacity,
            interval: min_interval,
        }
    }

    /// Limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO, 1)
    }

    pub fn min_interval(&self) -> Duration {
        self.interval
    }

    /// Wait until a call may be made, then take its token.
    ///
    /// Cancel safe: dropping the future before it completes takes nothing.
    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                let now = Instant::now();
                bucket.refill(now, self.interval, self.capacity);
                // a full bucket earns nothing, so the refill clock starts now
                if bucket.tokens == self.capacity {
                    bucket.last_refill = now;
                }
                if bucket.tokens > 0 {
                    bucket.tokens -= 1;
                    return;
                }
                (bucket.last_refill + self.interval).saturating_duration_since(now)
            };
            sleep(wait).await;
        }
    }
}
