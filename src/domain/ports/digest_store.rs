//! Digest store port: where finished pipeline traces are handed off.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::PipelineTrace;

#[async_trait]
pub trait DigestStore: Send + Sync {
    /// Persist a finished trace; returns a locator for the stored record.
    async fn save(&self, trace: &PipelineTrace) -> DomainResult<String>;

    async fn load(&self, run_id: &str) -> DomainResult<Option<PipelineTrace>>;
}
