//! In-memory trace sink.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::models::TraceEvent;
use crate::domain::ports::{TraceSink, TraceSinkError};

/// Keeps every event in memory. Can be switched into a failing mode to
/// exercise sink-error handling.
#[derive(Default)]
pub struct InMemoryTraceSink {
    events: RwLock<Vec<TraceEvent>>,
    fail_writes: bool,
}

impl InMemoryTraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects every append
    pub fn failing() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            fail_writes: true,
        }
    }

    pub async fn events(&self) -> Vec<TraceEvent> {
        self.events.read().await.clone()
    }

    pub async fn events_for(&self, correlation_id: &str) -> Vec<TraceEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.correlation_id == correlation_id)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl TraceSink for InMemoryTraceSink {
    async fn append(&self, event: &TraceEvent) -> Result<(), TraceSinkError> {
        if self.fail_writes {
            return Err(TraceSinkError::Unavailable("sink configured to fail".to_string()));
        }
        self.events.write().await.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_events_filtered_by_correlation_id() {
        let sink = InMemoryTraceSink::new();
        sink.append(&TraceEvent::start("a", "1", "classifier", Utc::now())).await.unwrap();
        sink.append(&TraceEvent::start("b", "1", "classifier", Utc::now())).await.unwrap();

        assert_eq!(sink.len().await, 2);
        assert_eq!(sink.events_for("a").await.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_sink_rejects() {
        let sink = InMemoryTraceSink::failing();
        let result = sink.append(&TraceEvent::start("a", "1", "classifier", Utc::now())).await;
        assert!(matches!(result, Err(TraceSinkError::Unavailable(_))));
        assert!(sink.is_empty().await);
    }
}
