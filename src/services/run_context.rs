//! Per-run context threaded through every stage call.

use std::collections::BTreeMap;

use tokio::sync::Mutex;

use crate::domain::models::{AgentUsage, TokenUsage};

/// Usage tally keyed by agent name, scoped to one run.
#[derive(Debug, Default)]
pub struct UsageLedger {
    agents: Mutex<BTreeMap<String, AgentUsage>>,
}

impl UsageLedger {
    pub async fn record_success(&self, agent: &str, usage: Option<TokenUsage>) {
        let mut agents = self.agents.lock().await;
        agents.entry(agent.to_string()).or_default().record_success(usage);
    }

    pub async fn record_failure(&self, agent: &str) {
        let mut agents = self.agents.lock().await;
        agents.entry(agent.to_string()).or_default().record_failure();
    }

    pub async fn snapshot(&self) -> BTreeMap<String, AgentUsage> {
        self.agents.lock().await.clone()
    }
}

/// Identity and accounting for one pipeline run.
///
/// A fresh context is created per run, so usage never leaks between runs.
#[derive(Debug, Default)]
pub struct RunContext {
    correlation_id: Option<String>,
    usage: UsageLedger,
}

impl RunContext {
    pub fn new(correlation_id: Option<String>) -> Self {
        Self {
            correlation_id: correlation_id.filter(|id| !id.trim().is_empty()),
            usage: UsageLedger::default(),
        }
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn usage(&self) -> &UsageLedger {
        &self.usage
    }
}
