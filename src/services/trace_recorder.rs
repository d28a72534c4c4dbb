//! Request-scoped recorder of generation-call events.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::domain::models::{TokenUsage, TraceEvent};
use crate::domain::ports::TraceSink;
use crate::services::run_context::RunContext;

/// Appends start/end/error events for every generation call to a sink.
///
/// Recording is best-effort: events without a correlation id are dropped and
/// sink failures are logged, never returned.
#[derive(Clone, Default)]
pub struct TraceRecorder {
    sink: Option<Arc<dyn TraceSink>>,
}

impl TraceRecorder {
    pub fn new(sink: Arc<dyn TraceSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Recorder that discards everything.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub async fn call_started(&self, ctx: &RunContext, call_id: &str, agent: &str) {
        let Some(correlation_id) = ctx.correlation_id() else {
            return;
        };
        self.record(TraceEvent::start(correlation_id, call_id, agent, Utc::now()))
            .await;
    }

    pub async fn call_ended(
        &self,
        ctx: &RunContext,
        call_id: &str,
        agent: &str,
        duration_ms: u64,
        usage: Option<TokenUsage>,
    ) {
        let Some(correlation_id) = ctx.correlation_id() else {
            return;
        };
        self.record(TraceEvent::end(
            correlation_id,
            call_id,
            agent,
            Utc::now(),
            duration_ms,
            usage,
        ))
        .await;
    }

    pub async fn call_failed(
        &self,
        ctx: &RunContext,
        call_id: &str,
        agent: &str,
        duration_ms: u64,
        error: &str,
    ) {
        let Some(correlation_id) = ctx.correlation_id() else {
            return;
        };
        self.record(TraceEvent::error(
            correlation_id,
            call_id,
            agent,
            Utc::now(),
            duration_ms,
            error,
        ))
        .await;
    }

    /// Append one event, logging sink failures.
    pub async fn record(&self, event: TraceEvent) {
        let Some(sink) = &self.sink else {
            return;
        };
        if let Err(e) = sink.append(&event).await {
            warn!(
                correlation_id = %event.correlation_id,
                call_id = %event.call_id,
                agent = %event.agent,
                kind = event.kind.as_str(),
                error = %e,
                "failed to record trace event"
            );
        }
    }
}
