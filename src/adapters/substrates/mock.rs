//! Mock generator for testing.
//!
//! Responses are scripted per agent label, with an optional artificial
//! latency so concurrent stages visibly overlap. Every call is logged with
//! its start and end instants.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

use crate::domain::models::TokenUsage;
use crate::domain::ports::{
    ChatMessage, Generation, GenerationError, GenerationParams, GenerationRequest, TextGenerator,
};

/// Mock response configuration.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Output text
    pub output: String,
    /// Whether to simulate failure
    pub fail: bool,
    /// Error message if failing
    pub error_message: Option<String>,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Sleep before answering
    pub delay: Option<Duration>,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            output: "{}".to_string(),
            fail: false,
            error_message: None,
            input_tokens: 100,
            output_tokens: 50,
            delay: None,
        }
    }
}

impl MockResponse {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            ..Default::default()
        }
    }

    /// Successful response built from a JSON value
    pub fn json(value: serde_json::Value) -> Self {
        Self::success(value.to_string())
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            fail: true,
            error_message: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_usage(mut self, input_tokens: u64, output_tokens: u64) -> Self {
        self.input_tokens = input_tokens;
        self.output_tokens = output_tokens;
        self
    }
}

/// One recorded call
#[derive(Debug, Clone)]
pub struct MockCall {
    pub agent: String,
    pub messages: Vec<ChatMessage>,
    pub params: GenerationParams,
    pub started: Instant,
    pub finished: Instant,
}

impl MockCall {
    /// Whether the two calls were in flight at the same time
    pub fn overlaps(&self, other: &MockCall) -> bool {
        self.started < other.finished && other.started < self.finished
    }
}

/// Mock generator for testing.
pub struct MockGenerator {
    default_response: MockResponse,
    agent_responses: RwLock<HashMap<String, MockResponse>>,
    calls: Mutex<Vec<MockCall>>,
    configured: bool,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::with_default_response(MockResponse::default())
    }

    pub fn with_default_response(response: MockResponse) -> Self {
        Self {
            default_response: response,
            agent_responses: RwLock::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            configured: true,
        }
    }

    /// Generator that behaves like a provider with no credentials.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Builder form of [`set_response_for_agent`](Self::set_response_for_agent).
    pub fn with_agent_response(mut self, agent: impl Into<String>, response: MockResponse) -> Self {
        self.agent_responses.get_mut().insert(agent.into(), response);
        self
    }

    pub async fn set_response_for_agent(&self, agent: impl Into<String>, response: MockResponse) {
        let mut responses = self.agent_responses.write().await;
        responses.insert(agent.into(), response);
    }

    async fn get_response(&self, agent: &str) -> MockResponse {
        let responses = self.agent_responses.read().await;
        responses
            .get(agent)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone())
    }

    /// All recorded calls, in completion order.
    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().await.clone()
    }

    pub async fn calls_for(&self, agent: &str) -> Vec<MockCall> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.agent == agent)
            .cloned()
            .collect()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    pub async fn clear(&self) {
        self.calls.lock().await.clear();
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn provider_id(&self) -> &str {
        "mock"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Generation, GenerationError> {
        if !self.configured {
            return Err(GenerationError::NotConfigured("mock generator has no credentials".to_string()));
        }

        let started = Instant::now();
        let response = self.get_response(&request.agent).await;

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }

        self.calls.lock().await.push(MockCall {
            agent: request.agent,
            messages: request.messages,
            params: request.params,
            started,
            finished: Instant::now(),
        });

        if response.fail {
            return Err(GenerationError::Http {
                status: 500,
                body: response
                    .error_message
                    .unwrap_or_else(|| "Mock failure".to_string()),
            });
        }

        Ok(Generation::new(
            response.output,
            Some(TokenUsage::new(response.input_tokens, response.output_tokens)),
        ))
    }
}
