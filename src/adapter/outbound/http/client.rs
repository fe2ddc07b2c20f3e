//! Resilient fetch client.
//!
//! One logical request = up to `max_attempts` transport calls. Each attempt
//! first waits on the host rate limiter. Transient failures back off
//! exponentially with jitter; everything else is handed back to the caller.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::limiter::HostRateLimiter;
use crate::error::{FailureCause, FetchError};
use crate::port::outbound::{HttpRequest, HttpResponse, HttpTransport};

/// Longest body excerpt carried in a [`FetchError::Status`].
const BODY_EXCERPT_LEN: usize = 300;

/// Upper bound on a single backoff, jitter included.
pub const MAX_BACKOFF: Duration = Duration::from_secs(60 * 60);

/// Retry schedule for one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub backoff_base: Duration,
    /// Upper bound of the uniform random delay added to each backoff.
    pub jitter: Duration,
}

impl RetryPolicy {
    /// Deterministic part of the delay after a failed `attempt` (0-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
            .min(MAX_BACKOFF)
    }

    fn jitter(&self) -> Duration {
        if self.jitter.is_zero() {
            return Duration::ZERO;
        }
        self.jitter
            .min(MAX_BACKOFF)
            .mul_f64(rand::thread_rng().gen::<f64>())
    }

    /// `base` plus jitter, capped at [`MAX_BACKOFF`].
    fn delay(&self, base: Duration) -> Duration {
        base.saturating_add(self.jitter()).min(MAX_BACKOFF)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            backoff_base: Duration::from_millis(600),
            jitter: Duration::from_millis(250),
        }
    }
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// HTTP client with per-host throttling and bounded retries.
///
/// Cheap to clone; the limiter is shared, the transport is whatever the
/// caller handed in (one per worker in the build pool).
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn HttpTransport>,
    limiter: Arc<HostRateLimiter>,
    policy: RetryPolicy,
}

impl FetchClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        limiter: Arc<HostRateLimiter>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            limiter,
            policy,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Perform one logical request.
    ///
    /// Returns the first 200 response, or the first response whose status is
    /// not retryable. Connection failures, timeouts, truncated bodies, 429/5xx
    /// and a 403 on the first attempt are retried.
    ///
    /// # Errors
    ///
    /// [`FetchError::Exhausted`] once all attempts failed transiently, or
    /// [`FetchError::Transport`] for a non-transient transport failure.
    pub async fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_cause = None;

        for attempt in 0..max_attempts {
            self.limiter.wait(&request.url).await;

            let delay = match self.transport.send(request).await {
                Ok(response) if response.is_ok() => return Ok(response),
                Ok(response) if response.status == 403 && attempt == 0 => {
                    last_cause = Some(FailureCause::Status(403));
                    self.policy.backoff(0)
                }
                Ok(response) if is_retryable_status(response.status) => {
                    last_cause = Some(FailureCause::Status(response.status));
                    self.policy.backoff(attempt)
                }
                Ok(response) => return Ok(response),
                Err(err) if err.kind.is_transient() => {
                    last_cause = Some(FailureCause::Transport(err));
                    self.policy.backoff(attempt)
                }
                Err(err) => return Err(err.into()),
            };

            if attempt + 1 >= max_attempts {
                break;
            }

            let delay = self.policy.delay(delay);
            if let Some(cause) = &last_cause {
                warn!(
                    url = %request.url,
                    attempt = attempt + 1,
                    max_attempts,
                    cause = %cause,
                    delay_ms = delay.as_millis() as u64,
                    "Request failed, retrying"
                );
            }
            sleep(delay).await;
        }

        Err(FetchError::Exhausted {
            url: request.url.to_string(),
            attempts: max_attempts,
            cause: last_cause.unwrap_or(FailureCause::Status(0)),
        })
    }

    /// Fetch and decode a JSON body. Any status other than 200 is an error.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::fetch`] errors, plus [`FetchError::Status`] for a
    /// non-200 response and [`FetchError::Decode`] for an undecodable body.
    pub async fn get_json<T>(&self, request: &HttpRequest) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let response = self.fetch(request).await?;
        if !response.is_ok() {
            return Err(FetchError::Status {
                url: request.url.to_string(),
                status: response.status,
                body: excerpt(&response.body),
            });
        }

        debug!(url = %request.url, bytes = response.body.len(), "Fetched");
        serde_json::from_str(&response.body).map_err(|err| FetchError::Decode {
            url: request.url.to_string(),
            reason: err.to_string(),
        })
    }
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
