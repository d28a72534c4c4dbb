//! OpenAI-compatible chat completions generator.
//!
//! Posts to `{base_url}/v1/chat/completions`. Works against OpenAI itself and
//! any server exposing the same wire format (Azure OpenAI, local gateways).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{GenerationConfig, ProviderKind, TokenUsage};
use crate::domain::ports::{Generation, GenerationError, GenerationRequest, TextGenerator};

/// Configuration for the OpenAI-compatible generator.
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    /// API key. Falls back to `OPENAI_API_KEY` env var.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiCompatConfig {
    fn default() -> Self {
        let generation = GenerationConfig {
            provider: ProviderKind::OpenAi,
            ..Default::default()
        };
        Self::from_generation(&generation)
    }
}

impl OpenAiCompatConfig {
    pub fn from_generation(config: &GenerationConfig) -> Self {
        Self {
            api_key: config.resolve_api_key(),
            base_url: config.effective_base_url(),
            model: config.effective_model(),
            timeout_secs: config.timeout_secs,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// OpenAI-compatible generator.
pub struct OpenAiCompatGenerator {
    config: OpenAiCompatConfig,
    client: reqwest::Client,
}

impl OpenAiCompatGenerator {
    pub fn new(config: OpenAiCompatConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                DomainError::ValidationFailed(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self { config, client })
    }

    fn build_request(&self, request: &GenerationRequest) -> ChatCompletionsRequest {
        ChatCompletionsRequest {
            model: self.config.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: request.params.temperature,
            max_tokens: request.params.max_tokens,
            response_format: request.params.json_mode.then(ResponseFormat::json_object),
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatGenerator {
    fn provider_id(&self) -> &str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Generation, GenerationError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            GenerationError::NotConfigured(
                "OpenAI API key not set. Set OPENAI_API_KEY env var or configure api_key."
                    .to_string(),
            )
        })?;

        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(&request))
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(GenerationError::Http { status, body });
        }

        let result: ChatCompletionsResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let text = result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::InvalidResponse("Response had no choices".to_string()))?;

        let usage = result
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens));

        Ok(Generation::new(text, usage))
    }
}

// -- Chat completions wire types --

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

impl ResponseFormat {
    fn json_object() -> Self {
        Self {
            format_type: "json_object",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
