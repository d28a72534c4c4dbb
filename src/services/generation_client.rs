//! Fail-soft text-generation client.
//!
//! Wraps a [`TextGenerator`] with the behaviour every pipeline stage relies
//! on: one attempt per call, a `{}` fallback on any provider failure, usage
//! accounting into the run's ledger, and start/end/error trace events.

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{ChatMessage, GenerationParams, GenerationRequest, TextGenerator};
use crate::services::json_extraction::{parse_json, JsonExtractionError};
use crate::services::run_context::RunContext;
use crate::services::trace_recorder::TraceRecorder;

/// Text returned in place of model output when a call fails.
pub const FALLBACK_RESPONSE: &str = "{}";

/// Longest raw-output excerpt included in parse-failure logs.
const RAW_EXCERPT_CHARS: usize = 500;

#[derive(Clone)]
pub struct GenerationClient {
    generator: Arc<dyn TextGenerator>,
    recorder: TraceRecorder,
}

impl GenerationClient {
    pub fn new(generator: Arc<dyn TextGenerator>, recorder: TraceRecorder) -> Self {
        Self {
            generator,
            recorder,
        }
    }

    pub fn provider_id(&self) -> &str {
        self.generator.provider_id()
    }

    /// Run one generation. Never fails: provider errors yield [`FALLBACK_RESPONSE`].
    pub async fn invoke(
        &self,
        ctx: &RunContext,
        agent: &str,
        messages: Vec<ChatMessage>,
        params: GenerationParams,
    ) -> String {
        let call_id = Uuid::new_v4().to_string();
        self.recorder.call_started(ctx, &call_id, agent).await;
        let started = Instant::now();

        let result = self
            .generator
            .generate(GenerationRequest::new(agent, messages, params))
            .await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(generation) => {
                debug!(
                    agent,
                    call_id = %call_id,
                    duration_ms,
                    output_chars = generation.text.len(),
                    "generation call completed"
                );
                ctx.usage().record_success(agent, generation.usage).await;
                self.recorder
                    .call_ended(ctx, &call_id, agent, duration_ms, generation.usage)
                    .await;
                generation.text
            }
            Err(e) => {
                warn!(
                    agent,
                    call_id = %call_id,
                    provider = self.generator.provider_id(),
                    duration_ms,
                    error = %e,
                    "generation call failed; using fallback"
                );
                ctx.usage().record_failure(agent).await;
                self.recorder
                    .call_failed(ctx, &call_id, agent, duration_ms, &e.to_string())
                    .await;
                FALLBACK_RESPONSE.to_string()
            }
        }
    }

    /// Run one generation and parse the first JSON object out of the reply.
    ///
    /// The parse error carries the raw text; callers degrade to their own
    /// defaults rather than propagating it.
    pub async fn invoke_json<T: DeserializeOwned>(
        &self,
        ctx: &RunContext,
        agent: &str,
        messages: Vec<ChatMessage>,
        params: GenerationParams,
    ) -> Result<T, JsonExtractionError> {
        let text = self.invoke(ctx, agent, messages, params).await;
        parse_json(&text).map_err(|e| {
            warn!(
                agent,
                error = %e.message,
                raw = %excerpt(&e.raw),
                "model output was not valid JSON"
            );
            e
        })
    }
}

fn excerpt(raw: &str) -> String {
    if raw.chars().count() <= RAW_EXCERPT_CHARS {
        raw.to_string()
    } else {
        let head: String = raw.chars().take(RAW_EXCERPT_CHARS).collect();
        format!("{head}...")
    }
}
