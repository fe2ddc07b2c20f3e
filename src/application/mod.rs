//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod builder;
pub mod cache;
pub mod orchestration;
pub mod refresh;

pub use builder::{BuildEntry, EntryBuilder};
pub use cache::RegistryCache;
pub use orchestration::{BuildCounts, BuildOptions, BuildOrchestrator, BuildReport, BuilderFactory};
pub use refresh::{RefreshRegistry, RefreshSummary};
