//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for API keys (`OPINION_API_KEYS` or `OPINION_API_KEY`).
//!
//! # Example
//!
//! ```no_run
//! use marketpair::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("marketpair.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;
use url::Url;

use super::logging::LoggingConfig;
use super::market::MarketEntryConfig;
use crate::adapter::outbound::http::HttpSettings;
use crate::adapter::outbound::opinion::settings::OPINION_HOST;
use crate::adapter::outbound::opinion::OpinionSettings;
use crate::adapter::outbound::polymarket::settings::GAMMA_HOST;
use crate::adapter::outbound::polymarket::PolymarketSettings;
use crate::application::BuildOptions;
use crate::domain::MarketConfig;
use crate::error::{ConfigError, Result};

/// Where the registry is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("token_registry.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

/// Build pool and cache behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildConfig {
    /// Maximum concurrent build workers.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Ignore cached entries and rebuild every market.
    #[serde(default)]
    pub refresh: bool,
    /// Keep the previous entry when a rebuild fails.
    #[serde(default = "default_true")]
    pub keep_stale_on_error: bool,
    /// Skip expiry pruning.
    #[serde(default)]
    pub keep_expired: bool,
    /// Hours past resolution before an outcome is pruned.
    #[serde(default = "default_expiry_grace_hours")]
    pub expiry_grace_hours: u64,
}

const fn default_workers() -> usize {
    8
}

const fn default_true() -> bool {
    true
}

const fn default_expiry_grace_hours() -> u64 {
    12
}

/// Ten years; anything longer never prunes in practice.
const MAX_GRACE_HOURS: i64 = 24 * 365 * 10;

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            refresh: false,
            keep_stale_on_error: true,
            keep_expired: false,
            expiry_grace_hours: default_expiry_grace_hours(),
        }
    }
}

/// Command-line overrides applied on top of the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub output: Option<PathBuf>,
    pub refresh: bool,
    pub workers: Option<usize>,
    pub opinion_interval_ms: Option<u64>,
    pub gamma_interval_ms: Option<u64>,
    pub retries: Option<u32>,
    pub backoff_ms: Option<u64>,
    pub keep_expired: bool,
    pub expiry_grace_hours: Option<u64>,
}

/// Main application configuration.
///
/// Aggregates all configuration settings for the application. Load from a TOML
/// file using [`Config::load`] or parse directly with [`Config::parse_toml`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Timeouts and retries shared by both providers.
    #[serde(default)]
    pub http: HttpSettings,

    #[serde(default)]
    pub build: BuildConfig,

    /// Outcome registry (platform A).
    #[serde(default)]
    pub opinion: OpinionSettings,

    /// Market data (platform B).
    #[serde(default)]
    pub polymarket: PolymarketSettings,

    /// Markets to resolve, in output order.
    #[serde(default)]
    pub markets: Vec<MarketEntryConfig>,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// API keys from the environment replace any configured in the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Some(keys) = env_api_keys() {
            config.opinion.api_keys = keys;
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Apply command-line overrides and re-validate.
    ///
    /// # Errors
    ///
    /// Returns an error if an override produces an invalid configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if let Some(path) = &overrides.output {
            self.output.path.clone_from(path);
        }
        if overrides.refresh {
            self.build.refresh = true;
        }
        if let Some(workers) = overrides.workers {
            self.build.workers = workers;
        }
        if let Some(ms) = overrides.opinion_interval_ms {
            self.opinion.min_interval_ms = ms;
        }
        if let Some(ms) = overrides.gamma_interval_ms {
            self.polymarket.min_interval_ms = ms;
        }
        if let Some(retries) = overrides.retries {
            self.http.retry_max_attempts = retries;
        }
        if let Some(ms) = overrides.backoff_ms {
            self.http.retry_backoff_ms = ms;
        }
        if overrides.keep_expired {
            self.build.keep_expired = true;
        }
        if let Some(hours) = overrides.expiry_grace_hours {
            self.build.expiry_grace_hours = hours;
        }
        self.validate()
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.output.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "output.path",
            }
            .into());
        }
        if self.build.workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "build.workers",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.http.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.retry_max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.http.timeout_ms == 0 || self.http.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.timeout_ms",
                reason: "timeouts must be greater than 0".to_string(),
            }
            .into());
        }
        for (field, raw) in [
            ("opinion.api_url", &self.opinion.api_url),
            ("polymarket.gamma_api_url", &self.polymarket.gamma_api_url),
        ] {
            if let Err(err) = Url::parse(raw) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: err.to_string(),
                }
                .into());
            }
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: "must be \"pretty\" or \"json\"".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Resolved markets in configuration order. Entries that cannot be
    /// resolved are logged and skipped.
    #[must_use]
    pub fn markets(&self) -> Vec<MarketConfig> {
        self.markets
            .iter()
            .filter_map(|entry| match entry.resolve() {
                Ok(market) => Some(market),
                Err(err) => {
                    warn!(name = %entry.name, error = %err, "Skipping market");
                    None
                }
            })
            .collect()
    }

    #[must_use]
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            workers: self.build.workers,
            refresh: self.build.refresh,
            keep_stale_on_error: self.build.keep_stale_on_error,
        }
    }

    /// Grace window for expiry pruning, or `None` when pruning is off.
    #[must_use]
    pub fn expiry_grace(&self) -> Option<chrono::Duration> {
        if self.build.keep_expired {
            return None;
        }
        let hours = i64::try_from(self.build.expiry_grace_hours)
            .unwrap_or(MAX_GRACE_HOURS)
            .min(MAX_GRACE_HOURS);
        Some(chrono::Duration::hours(hours))
    }

    /// Minimum request spacing per upstream host.
    #[must_use]
    pub fn host_intervals(&self) -> Vec<(String, Duration)> {
        vec![
            (
                host_of(&self.opinion.api_url, OPINION_HOST),
                Duration::from_millis(self.opinion.min_interval_ms),
            ),
            (
                host_of(&self.polymarket.gamma_api_url, GAMMA_HOST),
                Duration::from_millis(self.polymarket.min_interval_ms),
            ),
        ]
    }
}

fn host_of(raw: &str, fallback: &str) -> String {
    Url::parse(raw)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| fallback.to_string())
}

/// `OPINION_API_KEYS` (comma separated) or `OPINION_API_KEY`, if set and
/// non-empty.
fn env_api_keys() -> Option<Vec<String>> {
    let raw = std::env::var("OPINION_API_KEYS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| std::env::var("OPINION_API_KEY").ok())?;
    let keys = parse_key_list(&raw);
    (!keys.is_empty()).then_some(keys)
}

fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MarketKind;
    use crate::testkit::config::SAMPLE_TOML;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.build.workers, 8);
        assert!(config.build.keep_stale_on_error);
        assert_eq!(config.build.expiry_grace_hours, 12);
        assert_eq!(config.http.retry_max_attempts, 4);
        assert_eq!(config.output.path, PathBuf::from("token_registry.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sample_config_parses() {
        let config: Config = toml::from_str(SAMPLE_TOML).unwrap();
        config.validate().unwrap();

        assert_eq!(config.build.workers, 4);
        assert_eq!(config.opinion.min_interval_ms, 300);

        let markets = config.markets();
        assert_eq!(markets.len(), 2);
        assert_eq!(markets[0].kind, MarketKind::Binary);
        assert_eq!(markets[1].kind, MarketKind::Categorical);
        assert_eq!(markets[1].market_slug, "fed-decision-in-january");
    }

    #[test]
    fn unresolvable_markets_are_skipped() {
        let config: Config = toml::from_str(
            r#"
            [[markets]]
            name = "Broken"
            market_slug = "x"

            [[markets]]
            name = "Good"
            registry_market_id = 1
            market_slug = "good"
            "#,
        )
        .unwrap();

        let markets = config.markets();
        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].name, "Good");
    }

    #[test]
    fn zero_workers_is_rejected() {
        let config: Config = toml::from_str("[build]\nworkers = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let config: Config = toml::from_str("[logging]\nformat = \"xml\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = Config::parse_toml("[build\nworkers = 1").unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Config(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = Config::default();
        config
            .apply_overrides(&ConfigOverrides {
                output: Some(PathBuf::from("out.json")),
                refresh: true,
                workers: Some(2),
                opinion_interval_ms: Some(1000),
                gamma_interval_ms: Some(0),
                retries: Some(6),
                backoff_ms: Some(50),
                keep_expired: true,
                expiry_grace_hours: Some(1),
            })
            .unwrap();

        assert_eq!(config.output.path, PathBuf::from("out.json"));
        assert!(config.build_options().refresh);
        assert_eq!(config.build_options().workers, 2);
        assert_eq!(config.http.retry_policy().max_attempts, 6);
        assert!(config.expiry_grace().is_none());
        assert_eq!(
            config.host_intervals(),
            vec![
                (OPINION_HOST.to_string(), Duration::from_millis(1000)),
                (GAMMA_HOST.to_string(), Duration::ZERO),
            ]
        );
    }

    #[test]
    fn invalid_override_is_rejected() {
        let mut config = Config::default();
        let overrides = ConfigOverrides {
            workers: Some(0),
            ..ConfigOverrides::default()
        };
        assert!(config.apply_overrides(&overrides).is_err());
    }

    #[test]
    fn expiry_grace_in_hours() {
        let config = Config::default();
        assert_eq!(config.expiry_grace(), Some(chrono::Duration::hours(12)));
    }

    #[test]
    fn host_follows_configured_url() {
        let mut config = Config::default();
        config.polymarket.gamma_api_url = "http://127.0.0.1:8080".into();
        assert_eq!(config.host_intervals()[1].0, "127.0.0.1");
    }

    #[test]
    fn key_list_splits_and_trims() {
        assert_eq!(parse_key_list(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(parse_key_list(" , ").is_empty());
    }
}
