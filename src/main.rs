use anyhow::Context;
use clap::Parser;
use marketpair::adapter::inbound::cli::build;
use marketpair::adapter::inbound::cli::command::{Cli, Commands};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => {
            let config = build::load_config(&args)
                .with_context(|| format!("failed to load config {}", args.config.display()))?;
            config.init_logging();
            info!("marketpair starting");

            build::execute(&config)
                .await
                .with_context(|| format!("failed to update {}", config.output.path.display()))?;
        }
    }

    Ok(())
}
