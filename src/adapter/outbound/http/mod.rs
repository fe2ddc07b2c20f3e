//! Shared HTTP plumbing used by every provider adapter.
//!
//! - [`HostRateLimiter`] spaces requests per upstream host.
//! - [`FetchClient`] wraps a transport with throttling and retries.
//! - [`ReqwestTransport`] is the production transport.

pub mod client;
pub mod limiter;
pub mod settings;
pub mod transport;

pub use client::{FetchClient, RetryPolicy};
pub use limiter::HostRateLimiter;
pub use settings::HttpSettings;
pub use transport::ReqwestTransport;
