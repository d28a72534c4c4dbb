//! Contradiction detector: finds insights in the same run that cannot both hold.

use std::collections::{BTreeSet, HashSet};

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentParams, InsightContradiction, StrategicInsight};
use crate::domain::ports::{ChatMessage, GenerationParams};
use crate::services::generation_client::GenerationClient;
use crate::services::prompting::insights_payload;
use crate::services::run_context::RunContext;
use crate::services::sanitize;

const SYSTEM: &str = "You review a set of strategic insights for internal consistency. \
                      Respond with JSON only.";

pub struct ContradictionDetector {
    client: GenerationClient,
    params: AgentParams,
}

impl ContradictionDetector {
    pub const AGENT: &'static str = "contradiction_detector";

    pub fn new(client: GenerationClient, params: AgentParams) -> Self {
        Self { client, params }
    }

    /// A pair is reported at most once regardless of the order the model
    /// names it in. Fewer than two insights never reaches the model.
    #[instrument(skip_all, fields(agent = "contradiction_detector", insights = insights.len()))]
    pub async fn detect(
        &self,
        ctx: &RunContext,
        insights: &[StrategicInsight],
    ) -> DomainResult<Vec<InsightContradiction>> {
        if insights.len() < 2 {
            debug!("fewer than two insights; nothing can contradict");
            return Ok(Vec::new());
        }

        let prompt = format!(
            "Find pairs of insights below that contradict each other, for example one calls a move a \
             threat while another calls the same trend an opportunity, or recommended actions pull in \
             opposite directions. Return {{\"contradictions\": [...]}} with:\n\
             - signal_id\n\
             - conflicts_with_signal_id\n\
             - severity: high | medium | low\n\
             - explanation\n\
             - recommended_resolution\n\
             Return an empty list when the insights are consistent.\n\n\
             Insights:\n{}",
            insights_payload(insights)?
        );
        let messages = vec![ChatMessage::system(SYSTEM), ChatMessage::user(prompt)];

        let root: Value = self
            .client
            .invoke_json(ctx, Self::AGENT, messages, GenerationParams::json(self.params))
            .await
            .unwrap_or(Value::Null);

        let ids: HashSet<&str> = insights.iter().map(|i| i.signal_id.as_str()).collect();
        let mut pairs = BTreeSet::new();
        let contradictions: Vec<InsightContradiction> = sanitize::items(&root, "contradictions")
            .iter()
            .filter_map(sanitize::contradiction)
            .filter(|c| {
                ids.contains(c.signal_id.as_str()) && ids.contains(c.conflicts_with_signal_id.as_str())
            })
            .filter(|c| {
                let (a, b) = if c.signal_id <= c.conflicts_with_signal_id {
                    (c.signal_id.clone(), c.conflicts_with_signal_id.clone())
                } else {
                    (c.conflicts_with_signal_id.clone(), c.signal_id.clone())
                };
                pairs.insert((a, b))
            })
            .collect();

        info!(contradictions = contradictions.len(), "contradiction scan complete");
        Ok(contradictions)
    }
}
