//! Registry stored as a pretty-printed JSON array.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::Entry;
use crate::error::Result;
use crate::port::outbound::RegistryStore;

/// [`RegistryStore`] backed by a single JSON file.
///
/// Reads are forgiving: a missing or unreadable file is an empty registry
/// and malformed records are skipped. Writes replace the whole file via a
/// temp file and rename.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Entry>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No registry file, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Failed to read registry, starting empty");
                return Ok(Vec::new());
            }
        };

        let records: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(Value::Array(records)) => records,
            Ok(_) => {
                warn!(path = %self.path.display(), "Registry is not a JSON array, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Malformed registry, starting empty");
                return Ok(Vec::new());
            }
        };

        let total = records.len();
        let entries: Vec<Entry> = records
            .into_iter()
            .enumerate()
            .filter_map(|(idx, record)| match serde_json::from_value(record) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(index = idx, error = %err, "Skipping malformed registry record");
                    None
                }
            })
            .collect();

        debug!(path = %self.path.display(), loaded = entries.len(), total, "Loaded registry");
        Ok(entries)
    }

    fn save(&self, entries: &[Entry]) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.write_all(b"\n").map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        debug!(path = %self.path.display(), entries = entries.len(), "Saved registry");
        Ok(())
    }
}
