//! Build orchestration.
//!
//! Turns a list of configured markets into entries, reusing cached entries
//! where possible and fanning the rest out to a bounded worker pool.
//!
//! # Architecture
//!
//! ```text
//! MarketConfig[] --> cache hit? --yes--> renamed cached Entry
//!                        |
//!                        no
//!                        v
//!                   task queue --> worker 1..N (own BuildEntry each)
//!                                       |
//!                                       +-- Ok  --> cache.insert
//!                                       +-- Err --> stale cached Entry or drop
//! ```
//!
//! # Modules
//!
//! - [`orchestrator`]: [`BuildOrchestrator`] and its options and report

pub mod orchestrator;

pub use orchestrator::{BuildCounts, BuildOptions, BuildOrchestrator, BuildReport, BuilderFactory};
