//! Registry files and configs in temporary directories.

use std::fs;
use std::path::{Path, PathBuf};

use marketpair::domain::Entry;
use marketpair::testkit::config::cache_only_toml;
use tempfile::TempDir;

/// A temp dir holding `registry.json` and `marketpair.toml`.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn registry_path(&self) -> PathBuf {
        self.dir.path().join("registry.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("marketpair.toml")
    }

    pub fn write_registry(&self, entries: &[Entry]) {
        let json = serde_json::to_string_pretty(entries).expect("serialize entries");
        fs::write(self.registry_path(), json).expect("write registry");
    }

    pub fn read_registry(&self) -> Vec<Entry> {
        read_entries(&self.registry_path())
    }

    /// Write a config whose markets are `(name, kind, registry id, slug)`.
    pub fn write_config(&self, markets: &[(&str, &str, &str, &str)]) -> PathBuf {
        let registry = self.registry_path();
        let toml = cache_only_toml(&registry.to_string_lossy(), markets);
        fs::write(self.config_path(), toml).expect("write config");
        self.config_path()
    }
}

pub fn read_entries(path: &Path) -> Vec<Entry> {
    let raw = fs::read_to_string(path).expect("read registry");
    serde_json::from_str(&raw).expect("parse registry")
}
