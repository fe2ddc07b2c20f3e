//! Marketpair - cross-platform prediction market pair registry.
//!
//! Resolves equivalent outcomes between an outcome registry (Opinion) and a
//! market data provider (Polymarket Gamma) and persists the matched pairs
//! with their trade identifiers for downstream monitors.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **`domain`** - Pure types and algorithms: ids, configured markets,
//!   entries, fingerprinting, outcome matching, expiry pruning
//! - **`port`** - Traits for providers, HTTP transport, and the store
//! - **`adapter`** - HTTP plumbing, provider clients, JSON store, CLI
//! - **`application`** - Entry builder, cache, worker-pool orchestration,
//!   and the refresh use case
//! - **`infrastructure`** - Configuration, logging, and wiring
//!
//! # Example
//!
//! ```no_run
//! use marketpair::infrastructure::bootstrap;
//! use marketpair::infrastructure::config::settings::Config;
//!
//! # async fn run() -> marketpair::error::Result<()> {
//! let config = Config::load("marketpair.toml")?;
//! let summary = bootstrap::run_build(&config).await?;
//! println!("{} entries", summary.entries.len());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
