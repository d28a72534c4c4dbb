//! JSON-lines trace sink
//!
//! Appends one generation-call event per line. The file is opened in append
//! mode so trace history from earlier runs is preserved.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::domain::models::TraceEvent;
use crate::domain::ports::{TraceSink, TraceSinkError};

/// Trace sink writing JSON lines to a local file
#[derive(Clone)]
pub struct JsonlTraceSink {
    path: PathBuf,
    log_file: Arc<Mutex<File>>,
}

impl JsonlTraceSink {
    /// Open (or create) the trace file, creating parent directories
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("failed to create trace log directory")?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open trace log file {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            log_file: Arc::new(Mutex::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TraceSink for JsonlTraceSink {
    async fn append(&self, event: &TraceEvent) -> Result<(), TraceSinkError> {
        let json = serde_json::to_string(event)?;

        {
            let mut file = self
                .log_file
                .lock()
                .map_err(|e| TraceSinkError::Unavailable(format!("trace log mutex poisoned: {}", e)))?;

            writeln!(file, "{}", json).map_err(|e| TraceSinkError::WriteFailed(e.to_string()))?;
            file.flush().map_err(|e| TraceSinkError::WriteFailed(e.to_string()))?;
        }

        debug!(
            correlation_id = %event.correlation_id,
            call_id = %event.call_id,
            agent = %event.agent,
            kind = event.kind.as_str(),
            "trace event appended"
        );

        Ok(())
    }
}

/// Replay every event in a JSON-lines trace file, in file order.
///
/// Blank lines are skipped; a malformed line is an error naming its line number.
pub async fn read_events(path: impl AsRef<Path>) -> Result<Vec<TraceEvent>> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read trace log {}", path.display()))?;

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<TraceEvent>(line)
                .with_context(|| format!("malformed trace event on line {}", idx + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sink_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("runs/trace/events.jsonl");

        let _sink = JsonlTraceSink::new(&log_path).await.unwrap();
        assert!(log_path.exists());
    }

    #[tokio::test]
    async fn test_append_then_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("trace.jsonl");
        let sink = JsonlTraceSink::new(&log_path).await.unwrap();

        let now = Utc::now();
        sink.append(&TraceEvent::start("run-1", "call-1", "classifier", now))
            .await
            .unwrap();
        sink.append(&TraceEvent::end("run-1", "call-1", "classifier", now, 12, None))
            .await
            .unwrap();

        let events = read_events(&log_path).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].duration_ms, Some(12));
    }

    #[tokio::test]
    async fn test_reopen_appends() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("trace.jsonl");

        for run in ["run-1", "run-2"] {
            let sink = JsonlTraceSink::new(&log_path).await.unwrap();
            sink.append(&TraceEvent::start(run, "call-1", "strategist", Utc::now()))
                .await
                .unwrap();
        }

        let events = read_events(&log_path).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].correlation_id, "run-1");
        assert_eq!(events[1].correlation_id, "run-2");
    }

    #[tokio::test]
    async fn test_concurrent_writes() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("trace.jsonl");
        let sink = JsonlTraceSink::new(&log_path).await.unwrap();

        let mut handles = vec![];
        for i in 0..10 {
            let sink = sink.clone();
            handles.push(tokio::spawn(async move {
                sink.append(&TraceEvent::start("run-1", format!("call-{}", i), "red_team", Utc::now()))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(read_events(&log_path).await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_read_events_reports_bad_line() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("trace.jsonl");
        std::fs::write(&log_path, "\nnot json\n").unwrap();

        let err = read_events(&log_path).await.unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
