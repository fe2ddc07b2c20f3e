//! Handler for the `build` command.

use tracing::info;

use crate::adapter::inbound::cli::command::BuildArgs;
use crate::application::RefreshSummary;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Load the config file named by `args` and apply the flag overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load_config(args: &BuildArgs) -> Result<Config> {
    let mut config = Config::load(&args.config)?;
    config.apply_overrides(&args.overrides())?;
    Ok(config)
}

/// Execute the build command with an already loaded config.
///
/// # Errors
///
/// Returns an error if the registry file cannot be read or written.
pub async fn execute(config: &Config) -> Result<RefreshSummary> {
    let summary = bootstrap::run_build(config).await?;
    info!(
        cached = summary.counts.cached,
        built = summary.counts.built,
        stale = summary.counts.stale,
        failed = summary.counts.failed,
        expired_entries = summary.expired_entries,
        expired_outcomes = summary.expired_children,
        "Registry updated"
    );
    println!("{}", summary_line(&summary, config));
    Ok(summary)
}

fn summary_line(summary: &RefreshSummary, config: &Config) -> String {
    format!(
        "wrote {} entries to {} ({}, {} expired)",
        summary.entries.len(),
        config.output.path.display(),
        summary.counts,
        summary.expired_entries,
    )
}
