//! Command-line interface definitions.
//!
//! Defines the CLI structure for the marketpair application using `clap`.
//! Every flag maps onto one configuration field and overrides the file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::infrastructure::config::settings::ConfigOverrides;

/// Cross-platform prediction market outcome registry builder
#[derive(Parser, Debug)]
#[command(name = "marketpair")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the marketpair CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve configured markets and write the pair registry
    Build(BuildArgs),
}

/// Arguments for `marketpair build`.
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "marketpair.toml")]
    pub config: PathBuf,

    /// Override the registry output path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Ignore cached entries and rebuild every market.
    #[arg(long)]
    pub refresh: bool,

    /// Override the number of concurrent build workers.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Minimum milliseconds between Opinion API requests.
    #[arg(long)]
    pub opinion_interval_ms: Option<u64>,

    /// Minimum milliseconds between Gamma API requests.
    #[arg(long)]
    pub gamma_interval_ms: Option<u64>,

    /// Total attempts per HTTP request, including the first.
    #[arg(long)]
    pub retries: Option<u32>,

    /// Base of the exponential retry backoff in milliseconds.
    #[arg(long)]
    pub backoff_ms: Option<u64>,

    /// Keep entries and outcomes whose resolution time has passed.
    #[arg(long)]
    pub keep_expired: bool,

    /// Hours past resolution before an outcome is pruned.
    #[arg(long)]
    pub expiry_grace_hours: Option<u64>,
}

impl BuildArgs {
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            output: self.output.clone(),
            refresh: self.refresh,
            workers: self.workers,
            opinion_interval_ms: self.opinion_interval_ms,
            gamma_interval_ms: self.gamma_interval_ms,
            retries: self.retries,
            backoff_ms: self.backoff_ms,
            keep_expired: self.keep_expired,
            expiry_grace_hours: self.expiry_grace_hours,
        }
    }
}
