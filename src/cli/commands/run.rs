//! Implementation of the `rivalscope run` command.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::adapters::store::JsonFileDigestStore;
use crate::adapters::substrates::GeneratorRegistry;
use crate::adapters::trace::JsonlTraceSink;
use crate::cli::output::{create_spinner, output, render_digest, CommandOutput};
use crate::domain::models::{AgentUsage, Config, FinalDigest, RawSignal, UserProduct};
use crate::domain::ports::DigestStore;
use crate::services::{GenerationClient, InsightPipeline, PipelineInput, TraceRecorder};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Product description file (YAML or JSON)
    #[arg(short, long)]
    pub product: PathBuf,

    /// JSON array of competitor signals
    #[arg(short, long)]
    pub signals: PathBuf,

    /// Correlation id for this run (defaults to a fresh UUID)
    #[arg(long)]
    pub run_id: Option<String>,

    /// Do not write the pipeline trace to the digest directory
    #[arg(long)]
    pub no_store: bool,
}

#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub run_id: String,
    pub provider: String,
    pub stored_at: Option<String>,
    pub total_tokens: u64,
    pub usage: BTreeMap<String, AgentUsage>,
    pub digest: FinalDigest,
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("{} {}", style("Run").bold(), self.run_id),
            render_digest(&self.digest),
            String::new(),
        ];
        let failed: u32 = self.usage.values().map(|u| u.failed_calls).sum();
        lines.push(format!(
            "{} tokens across {} agent(s) via {}{}",
            self.total_tokens,
            self.usage.len(),
            self.provider,
            if failed > 0 {
                format!(", {} failed call(s)", style(failed).red())
            } else {
                String::new()
            }
        ));
        if let Some(path) = &self.stored_at {
            lines.push(format!("Trace saved to {path}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// YAML also accepts JSON, but `.json` files go through serde_json for sharper errors.
pub fn load_product(path: &Path) -> Result<UserProduct> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read product file {}", path.display()))?;
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let product = if is_json {
        serde_json::from_str(&raw).context("Invalid product JSON")?
    } else {
        serde_yaml::from_str(&raw).context("Invalid product YAML")?
    };
    Ok(product)
}

pub fn load_signals(path: &Path) -> Result<Vec<RawSignal>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read signals file {}", path.display()))?;
    serde_json::from_str(&raw).context("Signals file must be a JSON array of signals")
}

/// Wire the configured provider and trace sink into a ready pipeline.
pub async fn build_pipeline(config: &Config) -> Result<(InsightPipeline, String)> {
    let generator = GeneratorRegistry::new(config.generation.clone())
        .configured()
        .context("Failed to create text generator")?;
    let provider = generator.provider_id().to_string();

    let recorder = if config.trace.enabled {
        let sink = JsonlTraceSink::new(&config.trace.path)
            .await
            .with_context(|| format!("Failed to open trace log {}", config.trace.path))?;
        TraceRecorder::new(Arc::new(sink))
    } else {
        TraceRecorder::disabled()
    };

    let client = GenerationClient::new(generator, recorder);
    Ok((InsightPipeline::new(client, &config.agents), provider))
}

pub async fn execute(args: RunArgs, config: &Config, json_mode: bool) -> Result<()> {
    let product = load_product(&args.product)?;
    let signals = load_signals(&args.signals)?;
    let run_id = args
        .run_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let (pipeline, provider) = build_pipeline(config).await?;
    let input = PipelineInput::new(product, signals).with_correlation_id(run_id.clone());

    let spinner = create_spinner(&format!("Analysing signals for run {run_id}"), json_mode);
    let result = pipeline.run(input).await;
    spinner.finish_and_clear();
    let trace = result.context("Pipeline run failed")?;

    let stored = if args.no_store {
        None
    } else {
        let store = JsonFileDigestStore::new(&config.storage.digest_dir);
        Some(store.save(&trace).await)
    };

    let run_output = RunOutput {
        run_id: trace.run_id.clone(),
        provider,
        stored_at: stored.as_ref().and_then(|r| r.as_ref().ok().cloned()),
        total_tokens: trace.total_tokens(),
        usage: trace.usage.clone(),
        digest: trace.final_digest,
    };
    output(&run_output, json_mode);

    if let Some(Err(err)) = stored {
        return Err(err).context(format!(
            "Digest was produced but could not be saved to {}",
            config.storage.digest_dir
        ));
    }
    info!(run_id = %run_output.run_id, "run finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_product_yaml_and_json() {
        let yaml = file_with(
            ".yaml",
            "name: Ledgerly\npositioning: Bookkeeping that files itself\ntarget_market: EU freelancers\nkey_features:\n  - bank sync\n",
        );
        let product = load_product(yaml.path()).unwrap();
        assert_eq!(product.name, "Ledgerly");
        assert_eq!(product.key_features, vec!["bank sync".to_string()]);

        let json = file_with(
            ".json",
            r#"{"name": "Ledgerly", "positioning": "p", "target_market": "t"}"#,
        );
        assert_eq!(load_product(json.path()).unwrap().name, "Ledgerly");
    }

    #[test]
    fn test_load_signals_rejects_object() {
        let file = file_with(".json", r#"{"id": "s1"}"#);
        let err = load_signals(file.path()).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }
}
