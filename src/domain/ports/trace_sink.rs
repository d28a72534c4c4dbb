//! Trace sink port: append-only destination for generation-call events.

use async_trait::async_trait;

use crate::domain::models::TraceEvent;

#[derive(Debug, thiserror::Error)]
pub enum TraceSinkError {
    #[error("Trace sink unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write trace event: {0}")]
    WriteFailed(String),

    #[error("Failed to serialize trace event: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Append-only, best-effort event log.
///
/// Callers never read through this trait; analysis replays the log offline.
#[async_trait]
pub trait TraceSink: Send + Sync {
    async fn append(&self, event: &TraceEvent) -> Result<(), TraceSinkError>;
}
