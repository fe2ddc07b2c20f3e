//! Per-host request spacing shared across workers.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{sleep_until, Instant};
use url::Url;

/// Longest spacing enforced between two requests to one host.
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Enforces a minimum interval between requests to the same host.
///
/// Each host has a "next allowed" instant. A caller reserves the next slot
/// under the lock and then sleeps outside it, so concurrent workers are only
/// serialized on the scheduling decision.
#[derive(Debug, Default)]
pub struct HostRateLimiter {
    intervals: HashMap<String, Duration>,
    next_allowed: Mutex<HashMap<String, Instant>>,
}

impl HostRateLimiter {
    /// Build a limiter from `(host, min interval)` pairs. Hosts are matched
    /// case-insensitively; a zero interval disables throttling for the host.
    /// Intervals are capped at [`MAX_INTERVAL`].
    pub fn new<I, S>(intervals: I) -> Self
    where
        I: IntoIterator<Item = (S, Duration)>,
        S: AsRef<str>,
    {
        let intervals = intervals
            .into_iter()
            .map(|(host, interval)| {
                (host.as_ref().to_ascii_lowercase(), interval.min(MAX_INTERVAL))
            })
            .collect();
        Self {
            intervals,
            next_allowed: Mutex::new(HashMap::new()),
        }
    }

    /// A limiter that never waits.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Reserve the next slot for `host` and return when it starts, or `None`
    /// if the host is not throttled.
    fn reserve(&self, host: &str) -> Option<Instant> {
        let host = host.to_ascii_lowercase();
        let interval = self.intervals.get(&host).copied().unwrap_or(Duration::ZERO);
        if interval.is_zero() {
            return None;
        }

        let now = Instant::now();
        let mut next_allowed = self.next_allowed.lock();
        let slot = next_allowed.get(&host).map_or(now, |next| (*next).max(now));
        next_allowed.insert(host, slot + interval);
        Some(slot)
    }

    /// Wait until a request to `host` is allowed.
    pub async fn wait_host(&self, host: &str) {
        if let Some(slot) = self.reserve(host) {
            if slot > Instant::now() {
                sleep_until(slot).await;
            }
        }
    }

    /// Wait until a request to the host of `url` is allowed.
    pub async fn wait(&self, url: &Url) {
        if let Some(host) = url.host_str() {
            self.wait_host(host).await;
        }
    }
}
