//! File-backed digest store: one pretty-printed JSON document per run.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::PipelineTrace;
use crate::domain::ports::DigestStore;

/// Writes `<dir>/<run_id>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileDigestStore {
    dir: PathBuf,
}

impl JsonFileDigestStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, run_id: &str) -> DomainResult<PathBuf> {
        if run_id.is_empty()
            || run_id.contains(['/', '\\'])
            || run_id == "."
            || run_id == ".."
        {
            return Err(DomainError::ValidationFailed(format!(
                "run id '{}' is not a valid file name",
                run_id
            )));
        }
        Ok(self.dir.join(format!("{}.json", run_id)))
    }
}

#[async_trait]
impl DigestStore for JsonFileDigestStore {
    async fn save(&self, trace: &PipelineTrace) -> DomainResult<String> {
        let path = self.path_for(&trace.run_id)?;
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            DomainError::StorageError(format!("failed to create {}: {}", self.dir.display(), e))
        })?;

        let json = serde_json::to_string_pretty(trace)?;
        tokio::fs::write(&path, json).await.map_err(|e| {
            DomainError::StorageError(format!("failed to write {}: {}", path.display(), e))
        })?;

        info!(run_id = %trace.run_id, path = %path.display(), "pipeline trace stored");
        Ok(path.display().to_string())
    }

    async fn load(&self, run_id: &str) -> DomainResult<Option<PipelineTrace>> {
        let path = self.path_for(run_id)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
