//! Output formatting utilities for the CLI.

use std::time::Duration;

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::domain::models::{FinalDigest, Urgency};

const SPINNER_TEMPLATE: &str = "[{elapsed_precise}] {spinner:.green} {msg}";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate to at most `max_chars` characters, appending "..." if truncated.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Spinner on stderr for the duration of a run. Hidden in JSON mode.
pub fn create_spinner(message: &str, json_mode: bool) -> ProgressBar {
    if json_mode {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::with_template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_CHARS);
    pb.set_style(spinner_style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn colorize_urgency(urgency: Urgency) -> StyledObject<&'static str> {
    let label = urgency.as_str();
    match urgency {
        Urgency::Critical => style(label).red().bold(),
        Urgency::High => style(label).red(),
        Urgency::Medium => style(label).yellow(),
        Urgency::Low => style(label).dim(),
    }
}

pub fn colorize_grade(grade: &str) -> StyledObject<&str> {
    match grade.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('A') => style(grade).green().bold(),
        Some('B') => style(grade).green(),
        Some('C') => style(grade).yellow(),
        Some('D' | 'F') => style(grade).red(),
        _ => style(grade).dim(),
    }
}

/// Human rendering of a digest: summary, ranked insight table, forecast.
pub fn render_digest(digest: &FinalDigest) -> String {
    let mut lines = vec![
        format!("{} {}", style("Quality grade:").bold(), colorize_grade(&digest.quality_grade)),
        String::new(),
        digest.executive_summary.clone(),
        String::new(),
    ];

    if digest.insights.is_empty() {
        lines.push("No insights made it into this digest.".to_string());
    } else {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(
                ["Score", "Competitor", "Urgency", "What happened", "Recommended action"]
                    .iter()
                    .map(|h| Cell::new(h).set_alignment(CellAlignment::Left)),
            );
        for entry in &digest.insights {
            table.add_row(vec![
                Cell::new(entry.quality_score).set_alignment(CellAlignment::Right),
                Cell::new(&entry.insight.competitor_name),
                Cell::new(colorize_urgency(entry.insight.urgency)),
                Cell::new(truncate(&entry.insight.what_happened, 60)),
                Cell::new(truncate(&entry.insight.recommended_action, 60)),
            ]);
        }
        lines.push(format!("{} {}:", style(digest.insights.len()).bold(), "insight(s)"));
        lines.push(table.to_string());

        for entry in &digest.insights {
            let notes: Vec<String> = [
                entry.red_team_challenge.as_ref().map(|n| format!("challenged: {n}")),
                entry.evidence_note.as_ref().map(|n| format!("unverified: {n}")),
                entry.contradiction_note.as_ref().map(|n| format!("conflict: {n}")),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !notes.is_empty() {
                lines.push(format!("  {}", style(&entry.insight.signal_id).cyan()));
                lines.extend(notes.into_iter().map(|n| format!("    - {n}")));
            }
        }
    }

    let scenarios = &digest.scenarios;
    if !scenarios.is_empty() {
        lines.push(String::new());
        lines.push(style("Outlook").bold().to_string());
        if !scenarios.market_direction.is_empty() {
            lines.push(scenarios.market_direction.clone());
        }
        for scenario in &scenarios.scenarios {
            lines.push(format!(
                "  - {} ({:.0}%): {}",
                scenario.competitor_name,
                scenario.confidence * 100.0,
                scenario.prediction
            ));
        }
        for wildcard in &scenarios.wildcards {
            lines.push(format!("  * wildcard: {wildcard}"));
        }
    }

    lines.join("\n")
}
