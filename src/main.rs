//! Rivalscope CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use rivalscope::cli::{commands, handle_error, Cli, Commands};
use rivalscope::infrastructure::config::ConfigLoader;
use rivalscope::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json_mode);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
    .context("Failed to load configuration")?;

    let _logger = LoggerImpl::init(&LogConfig::from_settings(&config.logging))
        .context("Failed to initialize logging")?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args, &config, cli.json).await,
        Commands::Trace(command) => commands::trace::execute(command, cli.json).await,
        Commands::Config(command) => commands::config::execute(command, &config, cli.json).await,
    }
}
