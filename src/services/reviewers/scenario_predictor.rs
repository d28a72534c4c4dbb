//! Scenario predictor: one forecast per run over signals grouped by competitor.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentParams, ClassifiedSignal, ScenarioPrediction, UserProduct};
use crate::domain::ports::{ChatMessage, GenerationParams};
use crate::services::generation_client::GenerationClient;
use crate::services::prompting::{classified_payload, system_message};
use crate::services::run_context::RunContext;
use crate::services::sanitize;

const ROLE: &str = "You are a market forecaster. Predict each competitor's next move from the \
                    pattern of its recent signals.";

pub struct ScenarioPredictor {
    client: GenerationClient,
    params: AgentParams,
}

/// Signals bucketed by competitor name, in first-seen order within each bucket.
pub fn group_by_competitor(classified: &[ClassifiedSignal]) -> BTreeMap<&str, Vec<&ClassifiedSignal>> {
    let mut groups: BTreeMap<&str, Vec<&ClassifiedSignal>> = BTreeMap::new();
    for signal in classified {
        groups
            .entry(signal.signal.competitor_name.as_str())
            .or_default()
            .push(signal);
    }
    groups
}

impl ScenarioPredictor {
    pub const AGENT: &'static str = "scenario_predictor";

    pub fn new(client: GenerationClient, params: AgentParams) -> Self {
        Self { client, params }
    }

    #[instrument(skip_all, fields(agent = "scenario_predictor", classified = classified.len()))]
    pub async fn predict(
        &self,
        ctx: &RunContext,
        product: &UserProduct,
        classified: &[ClassifiedSignal],
    ) -> DomainResult<ScenarioPrediction> {
        if classified.is_empty() {
            return Ok(ScenarioPrediction::default());
        }

        let groups: Vec<Value> = group_by_competitor(classified)
            .into_iter()
            .map(|(competitor, signals)| {
                json!({
                    "competitor_name": competitor,
                    "signals": signals.into_iter().map(classified_payload).collect::<Vec<_>>(),
                })
            })
            .collect();

        let prompt = format!(
            "Using the signals grouped by competitor below, return a JSON object with:\n\
             - market_direction: one paragraph on where the market is heading\n\
             - scenarios: list with, per competitor, competitor_name, prediction, confidence (0.0 to 1.0), \
               evidence (list of signal ids or facts), timeframe, impact_if_true, preemptive_action, counter_scenario\n\
             - wildcards: list of low-probability, high-impact developments\n\n\
             Competitors:\n{}",
            serde_json::to_string_pretty(&groups)?
        );
        let messages = vec![system_message(ROLE, product), ChatMessage::user(prompt)];

        let root: Value = self
            .client
            .invoke_json(ctx, Self::AGENT, messages, GenerationParams::json(self.params))
            .await
            .unwrap_or(Value::Null);

        let prediction = sanitize::scenario_prediction(&root);
        info!(
            scenarios = prediction.scenarios.len(),
            wildcards = prediction.wildcards.len(),
            "scenario prediction complete"
        );
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::substrates::{MockGenerator, MockResponse};
    use crate::domain::ports::Role;
    use crate::services::test_fixtures::{classified, client, product};
    use std::sync::Arc;

    #[test]
    fn test_group_by_competitor() {
        let signals = vec![
            classified("a", "Beta", 5),
            classified("b", "Alpha", 5),
            classified("c", "Beta", 7),
        ];
        let groups = group_by_competitor(&signals);

        assert_eq!(groups.len(), 2);
        let beta: Vec<&str> = groups["Beta"].iter().map(|s| s.id()).collect();
        assert_eq!(beta, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_prompt_is_grouped_and_output_sanitized() {
        let generator = Arc::new(MockGenerator::with_default_response(MockResponse::json(json!({
            "market_direction": "Price war in the low end",
            "scenarios": [{"competitor_name": "Beta", "prediction": "Free tier", "confidence": 0.7}],
            "wildcards": ["EU e-invoicing mandate"]
        }))));
        let predictor = ScenarioPredictor::new(client(generator.clone()), AgentParams::new(0.7, 4096));
        let signals = vec![classified("a", "Beta", 5), classified("b", "Alpha", 2)];

        let prediction = predictor
            .predict(&RunContext::default(), &product(), &signals)
            .await
            .unwrap();

        assert_eq!(prediction.market_direction, "Price war in the low end");
        assert_eq!(prediction.scenarios.len(), 1);

        let call = &generator.calls().await[0];
        let user = call.messages.iter().find(|m| m.role == Role::User).unwrap();
        assert!(user.content.contains("\"competitor_name\": \"Alpha\""));
    }

    #[tokio::test]
    async fn test_provider_failure_yields_empty_prediction() {
        let generator = Arc::new(MockGenerator::with_default_response(MockResponse::failure("timeout")));
        let predictor = ScenarioPredictor::new(client(generator), AgentParams::new(0.7, 4096));

        let prediction = predictor
            .predict(&RunContext::default(), &product(), &[classified("a", "Beta", 5)])
            .await
            .unwrap();
        assert!(prediction.is_empty());
    }
}
