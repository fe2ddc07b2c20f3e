//! HTTP client configuration.

use std::time::Duration;

use serde::Deserialize;

use super::client::RetryPolicy;

/// Timeouts and retry settings shared by all provider adapters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpSettings {
    /// Read timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Total attempts per logical request, including the first.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Base of the exponential backoff in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Upper bound of the uniform jitter added to each backoff.
    #[serde(default = "default_retry_jitter_ms")]
    pub retry_jitter_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout_ms() -> u64 {
    20_000
}

const fn default_connect_timeout_ms() -> u64 {
    8_000
}

const fn default_retry_max_attempts() -> u32 {
    4
}

const fn default_retry_backoff_ms() -> u64 {
    600
}

const fn default_retry_jitter_ms() -> u64 {
    250
}

fn default_user_agent() -> String {
    concat!("marketpair/", env!("CARGO_PKG_VERSION")).into()
}

impl HttpSettings {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts.max(1),
            backoff_base: Duration::from_millis(self.retry_backoff_ms),
            jitter: Duration::from_millis(self.retry_jitter_ms),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            retry_jitter_ms: default_retry_jitter_ms(),
            user_agent: default_user_agent(),
        }
    }
}
