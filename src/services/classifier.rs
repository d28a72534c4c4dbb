//! Signal classifier: category, confidence, weight, velocity, related signals.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentParams, Classification, ClassifiedSignal, RawSignal, UserProduct};
use crate::domain::ports::{ChatMessage, GenerationParams};
use crate::services::generation_client::GenerationClient;
use crate::services::prompting::{signal_payload, system_message};
use crate::services::run_context::RunContext;
use crate::services::sanitize;

const ROLE: &str = "You are a competitive-intelligence analyst. Classify each competitor signal.";

/// Classifies every raw signal in one batched call.
pub struct SignalClassifier {
    client: GenerationClient,
    params: AgentParams,
}

impl SignalClassifier {
    pub const AGENT: &'static str = "classifier";

    pub fn new(client: GenerationClient, params: AgentParams) -> Self {
        Self { client, params }
    }

    /// Classification is total: the output has one entry per input signal,
    /// in input order. Signals the model skipped get [`Classification::fallback`].
    #[instrument(skip_all, fields(agent = "classifier", signals = signals.len()))]
    pub async fn classify(
        &self,
        ctx: &RunContext,
        product: &UserProduct,
        signals: &[RawSignal],
    ) -> DomainResult<Vec<ClassifiedSignal>> {
        if signals.is_empty() {
            return Ok(Vec::new());
        }

        let messages = vec![
            system_message(ROLE, product),
            ChatMessage::user(self.user_prompt(signals)?),
        ];
        let root: Value = self
            .client
            .invoke_json(ctx, Self::AGENT, messages, GenerationParams::json(self.params))
            .await
            .unwrap_or(Value::Null);

        let known: BTreeSet<&str> = signals.iter().map(|s| s.id.as_str()).collect();
        let mut by_id: HashMap<String, Classification> = HashMap::new();
        for (id, mut classification) in sanitize::items(&root, "classifications")
            .iter()
            .filter_map(sanitize::classification)
        {
            if !known.contains(id.as_str()) {
                warn!(signal_id = %id, "classifier returned an unknown signal id");
                continue;
            }
            classification
                .related_signal_ids
                .retain(|related| known.contains(related.as_str()));
            by_id.entry(id).or_insert(classification);
        }

        let mut defaulted = 0usize;
        let classified: Vec<ClassifiedSignal> = signals
            .iter()
            .map(|signal| {
                let classification = by_id.remove(&signal.id).unwrap_or_else(|| {
                    defaulted += 1;
                    Classification::fallback()
                });
                ClassifiedSignal::new(signal.clone(), classification)
            })
            .collect();

        if defaulted > 0 {
            warn!(defaulted, "signals missing from classifier output received defaults");
        }
        info!(classified = classified.len(), defaulted, "signals classified");

        Ok(classified)
    }

    fn user_prompt(&self, signals: &[RawSignal]) -> DomainResult<String> {
        let payload: Vec<Value> = signals.iter().map(signal_payload).collect();
        Ok(format!(
            "Classify every signal below. Return {{\"classifications\": [...]}} with one entry per signal:\n\
             - signal_id: the signal's id\n\
             - category: offensive_move | defensive_move | market_expansion | internal_shift | ecosystem_play\n\
             - confidence: 0.0 to 1.0\n\
             - reasoning: one or two sentences\n\
             - strategic_weight: integer 1 to 10 for how much this matters to our product\n\
             - velocity: accelerating | steady | decelerating\n\
             - related_signal_ids: ids of other signals in this batch that belong to the same move\n\n\
             Signals:\n{}",
            serde_json::to_string_pretty(&payload)?
        ))
    }
}
