//! In-memory caches shared across build workers.

mod registry;

pub use registry::RegistryCache;
