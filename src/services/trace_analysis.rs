//! Offline analysis of a run's trace events.
//!
//! Rebuilds call spans from start/end/error pairs so a finished run can be
//! inspected after the fact: which agents ran, for how long, and which calls
//! were genuinely in flight at the same time.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::models::{TraceEvent, TraceEventKind};

/// One generation call reconstructed from its start and terminal events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSpan {
    pub call_id: String,
    pub agent: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub failed: bool,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl CallSpan {
    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }

    /// Open intervals intersect. Touching endpoints do not count.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.started_at < other.ended_at && other.started_at < self.ended_at
    }
}

/// Two calls from different agents that were in flight together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanOverlap {
    pub first_call_id: String,
    pub first_agent: String,
    pub second_call_id: String,
    pub second_agent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraceReport {
    pub correlation_id: String,
    /// Ordered by start time.
    pub spans: Vec<CallSpan>,
    /// Starts with no matching end or error.
    pub unmatched_starts: Vec<String>,
    pub overlaps: Vec<SpanOverlap>,
    /// Total span time per agent, in milliseconds.
    pub agent_durations_ms: BTreeMap<String, i64>,
}

impl TraceReport {
    pub fn distinct_agents(&self) -> usize {
        self.spans
            .iter()
            .map(|s| s.agent.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn failed_calls(&self) -> usize {
        self.spans.iter().filter(|s| s.failed).count()
    }

    pub fn has_concurrency(&self) -> bool {
        !self.overlaps.is_empty()
    }
}

/// Events for other correlation ids are ignored. Terminal events without a
/// start are ignored too; only the first terminal event closes a span.
pub fn analyze(events: &[TraceEvent], correlation_id: &str) -> TraceReport {
    let mut open: HashMap<&str, &TraceEvent> = HashMap::new();
    let mut start_order: Vec<&str> = Vec::new();
    let mut spans = Vec::new();

    for event in events.iter().filter(|e| e.correlation_id == correlation_id) {
        match event.kind {
            TraceEventKind::CallStart => {
                if open.insert(event.call_id.as_str(), event).is_none() {
                    start_order.push(event.call_id.as_str());
                }
            }
            TraceEventKind::CallEnd | TraceEventKind::CallError => {
                let Some(start) = open.remove(event.call_id.as_str()) else {
                    continue;
                };
                let usage = event.usage.unwrap_or_default();
                spans.push(CallSpan {
                    call_id: event.call_id.clone(),
                    agent: start.agent.clone(),
                    started_at: start.timestamp,
                    ended_at: event.timestamp,
                    failed: event.kind == TraceEventKind::CallError,
                    input_tokens: usage.input_tokens,
                    output_tokens: usage.output_tokens,
                });
            }
        }
    }

    spans.sort_by_key(|s| s.started_at);
    let unmatched_starts = start_order
        .into_iter()
        .filter(|id| open.contains_key(id))
        .map(str::to_string)
        .collect();

    let mut agent_durations_ms = BTreeMap::new();
    for span in &spans {
        *agent_durations_ms.entry(span.agent.clone()).or_insert(0) +=
            span.duration().num_milliseconds();
    }

    TraceReport {
        correlation_id: correlation_id.to_string(),
        overlaps: overlaps(&spans),
        spans,
        unmatched_starts,
        agent_durations_ms,
    }
}

fn overlaps(spans: &[CallSpan]) -> Vec<SpanOverlap> {
    let mut found = Vec::new();
    for (i, first) in spans.iter().enumerate() {
        for second in &spans[i + 1..] {
            // sorted by start, so nothing later can overlap `first`
            if second.started_at >= first.ended_at {
                break;
            }
            if first.agent != second.agent && first.overlaps(second) {
                found.push(SpanOverlap {
                    first_call_id: first.call_id.clone(),
                    first_agent: first.agent.clone(),
                    second_call_id: second.call_id.clone(),
                    second_agent: second.agent.clone(),
                });
            }
        }
    }
    found
}
