//! Implementation of the `rivalscope config` commands.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

const REDACTED: &str = "********";

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective merged configuration
    Show,
}

#[derive(Debug, Serialize)]
pub struct ConfigShowOutput {
    pub config: Config,
    /// Whether an API key was found in config or the provider's env var.
    pub api_key_present: bool,
}

impl ConfigShowOutput {
    /// The key itself never leaves the process.
    pub fn redacted(config: &Config) -> Self {
        let api_key_present = config.generation.resolve_api_key().is_some();
        let mut config = config.clone();
        if config.generation.api_key.is_some() {
            config.generation.api_key = Some(REDACTED.to_string());
        }
        Self {
            config,
            api_key_present,
        }
    }
}

impl CommandOutput for ConfigShowOutput {
    fn to_human(&self) -> String {
        let yaml = serde_yaml::to_string(&self.config).unwrap_or_default();
        let key_line = if self.api_key_present {
            format!("# api key: found for {}", self.config.generation.provider.as_str())
        } else {
            format!(
                "# api key: missing (set generation.api_key or {})",
                self.config.generation.provider.api_key_env()
            )
        };
        format!("{key_line}\n{yaml}")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(command: ConfigCommands, config: &Config, json_mode: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            output(&ConfigShowOutput::redacted(config), json_mode);
            Ok(())
        }
    }
}
