//! Anthropic API generator implementation.
//!
//! Makes direct HTTP calls to the Anthropic Messages API. System-role
//! messages are lifted into the `system` content-block array; strict JSON
//! mode is requested through an extra system instruction since the Messages
//! API has no response-format switch.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{GenerationConfig, TokenUsage};
use crate::domain::ports::{
    Generation, GenerationError, GenerationRequest, Role, TextGenerator,
};

const JSON_MODE_INSTRUCTION: &str =
    "Respond with a single valid JSON object and nothing else. Do not wrap it in code fences.";

/// Configuration for the Anthropic API generator.
#[derive(Debug, Clone)]
pub struct AnthropicApiConfig {
    /// API key (will be read from ANTHROPIC_API_KEY env if not set).
    pub api_key: Option<String>,
    /// API base URL.
    pub base_url: String,
    /// Model to use.
    pub model: String,
    /// API version header.
    pub api_version: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AnthropicApiConfig {
    fn default() -> Self {
        Self::from_generation(&GenerationConfig::default())
    }
}

impl AnthropicApiConfig {
    /// Build from the `generation` config section.
    pub fn from_generation(config: &GenerationConfig) -> Self {
        Self {
            api_key: config.resolve_api_key(),
            base_url: config.effective_base_url(),
            model: config.effective_model(),
            api_version: config.api_version.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Message role in Anthropic API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// System prompt content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: String,
}

impl SystemContentBlock {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            block_type: "text".to_string(),
            text: content.into(),
        }
    }
}

/// Content block in a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: Vec<ContentBlock>,
}

/// Request to the Anthropic Messages API.
#[derive(Debug, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<Vec<SystemContentBlock>>,
    pub messages: Vec<Message>,
    pub temperature: f32,
}

/// Usage information from the API.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl From<Usage> for TokenUsage {
    fn from(usage: Usage) -> Self {
        TokenUsage::new(usage.input_tokens, usage.output_tokens)
    }
}

/// Response from the Anthropic Messages API.
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Anthropic Messages API generator.
pub struct AnthropicApiGenerator {
    config: AnthropicApiConfig,
    client: Client,
}

impl AnthropicApiGenerator {
    pub fn new(config: AnthropicApiConfig) -> DomainResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                DomainError::ValidationFailed(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AnthropicApiConfig {
        &self.config
    }

    /// Build the Messages API request from a generation request.
    fn build_request(&self, request: &GenerationRequest) -> MessagesRequest {
        let mut system: Vec<SystemContentBlock> = Vec::new();
        let mut messages = Vec::with_capacity(request.messages.len());

        for message in &request.messages {
            let role = match message.role {
                Role::System => {
                    system.push(SystemContentBlock::text(&message.content));
                    continue;
                }
                Role::User => MessageRole::User,
                Role::Assistant => MessageRole::Assistant,
            };
            messages.push(Message {
                role,
                content: vec![ContentBlock::Text {
                    text: message.content.clone(),
                }],
            });
        }

        if request.params.json_mode {
            system.push(SystemContentBlock::text(JSON_MODE_INSTRUCTION));
        }

        MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: request.params.max_tokens,
            system: if system.is_empty() { None } else { Some(system) },
            messages,
            temperature: request.params.temperature,
        }
    }
}

#[async_trait]
impl TextGenerator for AnthropicApiGenerator {
    fn provider_id(&self) -> &str {
        "anthropic"
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Generation, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::NotConfigured("ANTHROPIC_API_KEY not set".to_string()))?;

        let api_request = self.build_request(&request);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url.trim_end_matches('/')))
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Http { status, body });
        }

        let result: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let text = result
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Generation::new(text, result.usage.map(TokenUsage::from)))
    }
}
