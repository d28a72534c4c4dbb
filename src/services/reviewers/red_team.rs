//! Red team: adversarial challenge of every strategic insight.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{info, instrument};

use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentParams, RedTeamChallenge, StrategicInsight, UserProduct};
use crate::domain::ports::{ChatMessage, GenerationParams};
use crate::services::generation_client::GenerationClient;
use crate::services::prompting::{insights_payload, system_message};
use crate::services::run_context::RunContext;
use crate::services::sanitize;

const ROLE: &str = "You are a red-team analyst. Your job is to find the weakest point in each \
                    strategic assessment and argue the strongest alternative reading.";

pub struct RedTeam {
    client: GenerationClient,
    params: AgentParams,
}

impl RedTeam {
    pub const AGENT: &'static str = "red_team";

    pub fn new(client: GenerationClient, params: AgentParams) -> Self {
        Self { client, params }
    }

    #[instrument(skip_all, fields(agent = "red_team", insights = insights.len()))]
    pub async fn challenge(
        &self,
        ctx: &RunContext,
        product: &UserProduct,
        insights: &[StrategicInsight],
    ) -> DomainResult<Vec<RedTeamChallenge>> {
        if insights.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = format!(
            "Challenge each insight below. Return {{\"challenges\": [...]}} with one entry per insight:\n\
             - signal_id\n\
             - original_assessment: the claim you are challenging\n\
             - challenge: why it may be wrong\n\
             - alternative_interpretation\n\
             - blind_spots: list of things the assessment ignores\n\
             - revised_urgency: critical | high | medium | low | unchanged\n\
             - confidence_adjustment: -0.3 to 0.3\n\
             - verdict: upheld | partially_challenged | overturned\n\n\
             Insights:\n{}",
            insights_payload(insights)?
        );
        let messages = vec![system_message(ROLE, product), ChatMessage::user(prompt)];

        let root: Value = self
            .client
            .invoke_json(ctx, Self::AGENT, messages, GenerationParams::json(self.params))
            .await
            .unwrap_or(Value::Null);

        let ids: HashSet<&str> = insights.iter().map(|i| i.signal_id.as_str()).collect();
        let mut seen = HashSet::new();
        let challenges: Vec<RedTeamChallenge> = sanitize::items(&root, "challenges")
            .iter()
            .filter_map(sanitize::red_team_challenge)
            .filter(|c| ids.contains(c.signal_id.as_str()))
            .filter(|c| seen.insert(c.signal_id.clone()))
            .collect();

        info!(challenges = challenges.len(), "red team review complete");
        Ok(challenges)
    }
}
