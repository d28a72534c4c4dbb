//! Verifier: checks each insight against the signal it claims to be derived from.

use std::collections::{HashMap, HashSet};

use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentParams, ClassifiedSignal, StrategicInsight, VerificationResult};
use crate::domain::ports::{ChatMessage, GenerationParams};
use crate::services::generation_client::GenerationClient;
use crate::services::prompting::signal_payload;
use crate::services::run_context::RunContext;
use crate::services::sanitize;

const SYSTEM: &str = "You are a fact checker. You only accept claims that the source material \
                      actually supports. Respond with JSON only.";

pub struct Verifier {
    client: GenerationClient,
    params: AgentParams,
}

impl Verifier {
    pub const AGENT: &'static str = "verifier";

    pub fn new(client: GenerationClient, params: AgentParams) -> Self {
        Self { client, params }
    }

    /// Pairs each insight with its source signal so the model judges the
    /// claim against the evidence rather than the insight's own wording.
    #[instrument(skip_all, fields(agent = "verifier", insights = insights.len()))]
    pub async fn verify(
        &self,
        ctx: &RunContext,
        insights: &[StrategicInsight],
        classified: &[ClassifiedSignal],
    ) -> DomainResult<Vec<VerificationResult>> {
        if insights.is_empty() {
            return Ok(Vec::new());
        }

        let sources: HashMap<&str, &ClassifiedSignal> =
            classified.iter().map(|s| (s.id(), s)).collect();
        let pairs: Vec<Value> = insights
            .iter()
            .map(|insight| {
                json!({
                    "insight": insight,
                    "source_signal": sources
                        .get(insight.signal_id.as_str())
                        .map(|s| signal_payload(&s.signal)),
                })
            })
            .collect();

        let prompt = format!(
            "For each insight below, decide whether its source signal supports it. Return \
             {{\"verifications\": [...]}} with one entry per insight:\n\
             - signal_id\n\
             - verified: true or false\n\
             - evidence_strength: 0.0 to 1.0\n\
             - evidence_note: what the source does or does not show\n\
             - missing_evidence: list of facts that would be needed to confirm the claim\n\n\
             Insights with sources:\n{}",
            serde_json::to_string_pretty(&pairs)?
        );
        let messages = vec![ChatMessage::system(SYSTEM), ChatMessage::user(prompt)];

        let root: Value = self
            .client
            .invoke_json(ctx, Self::AGENT, messages, GenerationParams::json(self.params))
            .await
            .unwrap_or(Value::Null);

        let ids: HashSet<&str> = insights.iter().map(|i| i.signal_id.as_str()).collect();
        let mut seen = HashSet::new();
        let results: Vec<VerificationResult> = sanitize::items(&root, "verifications")
            .iter()
            .filter_map(sanitize::verification)
            .filter(|v| ids.contains(v.signal_id.as_str()))
            .filter(|v| seen.insert(v.signal_id.clone()))
            .collect();

        let failed = results.iter().filter(|v| v.is_explicit_failure()).count();
        info!(results = results.len(), failed, "verification complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::substrates::{MockGenerator, MockResponse};
    use crate::domain::ports::Role;
    use crate::services::test_fixtures::{classified, client, insight};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_prompt_carries_source_signal() {
        let generator = Arc::new(MockGenerator::with_default_response(MockResponse::json(json!({
            "verifications": [
                {"signal_id": "s1", "verified": false, "evidence_strength": 0.2, "evidence_note": "No pricing page change"},
                {"signal_id": "s1", "verified": true, "evidence_strength": 0.9}
            ]
        }))));
        let verifier = Verifier::new(client(generator.clone()), AgentParams::new(0.2, 4096));

        let results = verifier
            .verify(&RunContext::default(), &[insight("s1")], &[classified("s1", "Rival", 7)])
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].is_explicit_failure());
        assert_eq!(results[0].evidence_note, "No pricing page change");

        let call = &generator.calls().await[0];
        let user = call.messages.iter().find(|m| m.role == Role::User).unwrap();
        assert!(user.content.contains("source_signal"));
        assert!(user.content.contains("Rival changed something (s1)"));
    }

    #[tokio::test]
    async fn test_malformed_entry_does_not_fail_insight() {
        let generator = Arc::new(MockGenerator::with_default_response(MockResponse::json(json!({
            "verifications": [{"signal_id": "s1", "verified": "maybe", "evidence_strength": "lots"}]
        }))));
        let verifier = Verifier::new(client(generator), AgentParams::new(0.2, 4096));

        let results = verifier
            .verify(&RunContext::default(), &[insight("s1")], &[])
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert!(!results[0].is_explicit_failure());
    }
}
