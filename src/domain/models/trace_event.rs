//! Generation-call trace events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::usage::TokenUsage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEventKind {
    CallStart,
    CallEnd,
    CallError,
}

impl TraceEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CallStart => "call_start",
            Self::CallEnd => "call_end",
            Self::CallError => "call_error",
        }
    }

    /// Whether this event closes a call opened by a `CallStart`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CallEnd | Self::CallError)
    }
}

/// One line of the append-only trace log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub correlation_id: String,
    /// Unique within the run; pairs a start with its end or error.
    pub call_id: String,
    pub agent: String,
    pub kind: TraceEventKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TraceEvent {
    pub fn start(
        correlation_id: impl Into<String>,
        call_id: impl Into<String>,
        agent: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            call_id: call_id.into(),
            agent: agent.into(),
            kind: TraceEventKind::CallStart,
            timestamp,
            duration_ms: None,
            usage: None,
            error: None,
        }
    }

    pub fn end(
        correlation_id: impl Into<String>,
        call_id: impl Into<String>,
        agent: impl Into<String>,
        timestamp: DateTime<Utc>,
        duration_ms: u64,
        usage: Option<TokenUsage>,
    ) -> Self {
        Self {
            kind: TraceEventKind::CallEnd,
            duration_ms: Some(duration_ms),
            usage,
            ..Self::start(correlation_id, call_id, agent, timestamp)
        }
    }

    pub fn error(
        correlation_id: impl Into<String>,
        call_id: impl Into<String>,
        agent: impl Into<String>,
        timestamp: DateTime<Utc>,
        duration_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            kind: TraceEventKind::CallError,
            duration_ms: Some(duration_ms),
            error: Some(error.into()),
            ..Self::start(correlation_id, call_id, agent, timestamp)
        }
    }
}
