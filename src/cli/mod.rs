//! Command-line interface for rivalscope.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::config::ConfigCommands;
pub use commands::run::RunArgs;
pub use commands::trace::TraceCommands;

#[derive(Parser, Debug)]
#[command(name = "rivalscope")]
#[command(about = "Rivalscope - competitive-intelligence insight pipeline", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Config file to use instead of .rivalscope/config.yaml
    #[arg(short, long, global = true, env = "RIVALSCOPE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the insight pipeline over a batch of competitor signals
    Run(RunArgs),

    /// Inspect generation-call trace logs
    #[command(subcommand)]
    Trace(TraceCommands),

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Print an error in the selected output mode and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let chain: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "caused_by": chain,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }
    std::process::exit(1);
}
