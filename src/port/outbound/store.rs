//! Registry persistence port.

use crate::domain::Entry;
use crate::error::Result;

/// Durable storage for the resolved registry between runs.
pub trait RegistryStore: Send + Sync {
    /// Load all persisted entries. A missing store is an empty registry.
    fn load(&self) -> Result<Vec<Entry>>;

    /// Replace the persisted registry with `entries`.
    fn save(&self, entries: &[Entry]) -> Result<()>;
}
