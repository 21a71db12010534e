//! Inter-call pacing for provider round trips.
//!
//! Batch resolution is sequential and each ticker costs one or more network
//! calls; the pacer enforces a minimum spacing between calls so free-tier
//! rate limits are respected. This is a deliberate throttle, configurable
//! but never removed.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Default spacing between per-ticker provider calls.
pub const DEFAULT_PACE: Duration = Duration::from_millis(500);

/// Enforces a minimum interval between successive provider calls.
#[derive(Clone)]
pub struct Pacer {
    limiter: Arc<DirectRateLimiter>,
    interval: Duration,
}

impl Pacer {
    /// Pacer allowing one call per `interval`. A zero interval disables
    /// pacing (useful in tests).
    pub fn new(interval: Duration) -> Self {
        let period = interval.max(Duration::from_millis(1));
        let quota = Quota::with_period(period)
            .expect("pacing period is always positive")
            .allow_burst(NonZeroU32::MIN);
        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
            interval,
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next call is allowed.
    pub async fn wait(&self) {
        if self.interval.is_zero() {
            return;
        }
        while let Err(not_until) = self.limiter.check() {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            tokio::time::sleep(wait.max(Duration::from_millis(1))).await;
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(DEFAULT_PACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn spaces_successive_calls_by_at_least_the_interval() {
        let pacer = Pacer::new(Duration::from_millis(40));

        let started = Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;

        // First call is free; the next two each wait out the interval.
        assert!(started.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn disabled_pacer_returns_immediately() {
        let pacer = Pacer::disabled();

        let started = Instant::now();
        for _ in 0..10 {
            pacer.wait().await;
        }
        assert!(started.elapsed() < Duration::from_millis(20));
    }
}
