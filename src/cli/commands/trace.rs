//! Implementation of the `rivalscope trace` commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use console::style;
use serde::Serialize;

use crate::adapters::trace::read_events;
use crate::cli::output::{output, CommandOutput};
use crate::services::{analyze, TraceReport};

#[derive(Subcommand, Debug)]
pub enum TraceCommands {
    /// Reconstruct the call timeline of one run from a trace log
    Analyze {
        /// JSON-lines trace file
        #[arg(short, long)]
        file: PathBuf,

        /// Correlation id of the run
        #[arg(short, long)]
        run_id: String,
    },
}

#[derive(Debug, Serialize)]
pub struct TraceAnalysisOutput {
    #[serde(flatten)]
    pub report: TraceReport,
    pub distinct_agents: usize,
    pub failed_calls: usize,
    pub concurrent: bool,
}

impl From<TraceReport> for TraceAnalysisOutput {
    fn from(report: TraceReport) -> Self {
        Self {
            distinct_agents: report.distinct_agents(),
            failed_calls: report.failed_calls(),
            concurrent: report.has_concurrency(),
            report,
        }
    }
}

impl CommandOutput for TraceAnalysisOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        if report.spans.is_empty() && report.unmatched_starts.is_empty() {
            return format!("No calls recorded for run {}.", report.correlation_id);
        }

        let first_start = report.spans.first().map(|s| s.started_at);
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(["AGENT", "OFFSET MS", "DURATION MS", "TOKENS", "STATUS"].map(Cell::new));
        for span in &report.spans {
            let offset = first_start.map_or(0, |t0| (span.started_at - t0).num_milliseconds());
            table.add_row(vec![
                Cell::new(&span.agent),
                Cell::new(offset).set_alignment(CellAlignment::Right),
                Cell::new(span.duration().num_milliseconds()).set_alignment(CellAlignment::Right),
                Cell::new(span.input_tokens + span.output_tokens).set_alignment(CellAlignment::Right),
                Cell::new(if span.failed {
                    style("failed").red().to_string()
                } else {
                    style("ok").green().to_string()
                }),
            ]);
        }

        let mut lines = vec![
            format!(
                "{} call(s) by {} agent(s) in run {}:",
                style(report.spans.len()).bold(),
                self.distinct_agents,
                report.correlation_id
            ),
            table.to_string(),
            String::new(),
        ];
        if self.concurrent {
            lines.push(format!("{} overlapping call pair(s):", report.overlaps.len()));
            for overlap in &report.overlaps {
                lines.push(format!("  - {} || {}", overlap.first_agent, overlap.second_agent));
            }
        } else {
            lines.push("No overlapping calls.".to_string());
        }
        if !report.unmatched_starts.is_empty() {
            lines.push(format!(
                "{} call(s) never finished: {}",
                style(report.unmatched_starts.len()).yellow(),
                report.unmatched_starts.join(", ")
            ));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(command: TraceCommands, json_mode: bool) -> Result<()> {
    match command {
        TraceCommands::Analyze { file, run_id } => {
            let events = read_events(&file).await?;
            let analysis = TraceAnalysisOutput::from(analyze(&events, &run_id));
            output(&analysis, json_mode);
            Ok(())
        }
    }
}
