//! Strategist: classified signals to product-specific strategic insights.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentParams, ClassifiedSignal, StrategicInsight, UserProduct};
use crate::domain::ports::{ChatMessage, GenerationParams};
use crate::services::generation_client::GenerationClient;
use crate::services::prompting::{classified_payload, system_message};
use crate::services::run_context::RunContext;
use crate::services::sanitize;

const ROLE: &str = "You are a product strategist. Translate competitor moves into concrete \
                    implications and actions for our product.";

pub struct Strategist {
    client: GenerationClient,
    params: AgentParams,
}

impl Strategist {
    pub const AGENT: &'static str = "strategist";

    pub fn new(client: GenerationClient, params: AgentParams) -> Self {
        Self { client, params }
    }

    /// Signals eligible for insights, heaviest first. Ties keep input order.
    pub fn eligible_signals(classified: &[ClassifiedSignal]) -> Vec<&ClassifiedSignal> {
        let mut eligible: Vec<&ClassifiedSignal> = classified
            .iter()
            .filter(|s| s.is_insight_eligible())
            .collect();
        eligible.sort_by(|a, b| b.weight().cmp(&a.weight()));
        eligible
    }

    /// One batched call over every eligible signal. Insights referencing a
    /// sub-threshold or unknown signal are discarded, as are repeats.
    #[instrument(skip_all, fields(agent = "strategist", classified = classified.len()))]
    pub async fn generate(
        &self,
        ctx: &RunContext,
        product: &UserProduct,
        classified: &[ClassifiedSignal],
    ) -> DomainResult<Vec<StrategicInsight>> {
        let eligible = Self::eligible_signals(classified);
        if eligible.is_empty() {
            debug!("no signals reached the insight threshold; skipping strategist call");
            return Ok(Vec::new());
        }

        let messages = vec![
            system_message(ROLE, product),
            ChatMessage::user(self.user_prompt(&eligible)?),
        ];
        let root: Value = self
            .client
            .invoke_json(ctx, Self::AGENT, messages, GenerationParams::json(self.params))
            .await
            .unwrap_or(Value::Null);

        let competitors: HashMap<&str, &str> = eligible
            .iter()
            .map(|s| (s.id(), s.signal.competitor_name.as_str()))
            .collect();

        let mut seen = HashSet::new();
        let mut insights = Vec::new();
        for item in sanitize::items(&root, "insights") {
            let Some(insight) = sanitize::insight(item, |id| {
                competitors.get(id).map(|name| (*name).to_string()).unwrap_or_default()
            }) else {
                continue;
            };
            if !competitors.contains_key(insight.signal_id.as_str()) {
                warn!(signal_id = %insight.signal_id, "dropping insight for ineligible signal");
                continue;
            }
            if seen.insert(insight.signal_id.clone()) {
                insights.push(insight);
            }
        }

        info!(eligible = eligible.len(), insights = insights.len(), "strategic insights generated");
        Ok(insights)
    }

    fn user_prompt(&self, eligible: &[&ClassifiedSignal]) -> DomainResult<String> {
        let payload: Vec<Value> = eligible.iter().map(|s| classified_payload(s)).collect();
        Ok(format!(
            "The signals below are ordered by strategic weight, heaviest first. For each one that \
             warrants action, return an entry in {{\"insights\": [...]}} with:\n\
             - signal_id\n\
             - competitor_name\n\
             - what_happened\n\
             - strategic_implication\n\
             - impact_on_user: the concrete effect on our product and customers\n\
             - recommended_action\n\
             - urgency: critical | high | medium | low\n\
             - opportunity_or_threat: opportunity | threat | neutral\n\
             - time_horizon: immediate | short_term | long_term\n\
             Skip signals that do not matter to us.\n\n\
             Signals:\n{}",
            serde_json::to_string_pretty(&payload)?
        ))
    }
}
