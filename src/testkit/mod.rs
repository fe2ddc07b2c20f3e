//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`http`]: `ScriptedTransport`, a canned-response
//!   [`HttpTransport`](crate::port::outbound::HttpTransport).
//! - [`provider`]: `StaticRegistry` and `StaticMarketData`, in-memory
//!   providers with call counters.
//! - [`domain`]: Builders for outcomes, events, entries, and configs.
//! - [`config`]: Canonical test configuration files.

pub mod config;
pub mod domain;
pub mod http;
pub mod provider;
