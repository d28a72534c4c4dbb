//! Text-generation port.
//!
//! Abstracts the external generative text service behind a narrow
//! `generate(messages, params) -> text` capability so the pipeline can run
//! against any compliant provider, or a deterministic stub in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::models::{AgentParams, TokenUsage};

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Parameters for controlling one generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider for a single strict JSON object.
    pub json_mode: bool,
}

impl GenerationParams {
    pub fn json(params: AgentParams) -> Self {
        Self {
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            json_mode: true,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4096,
            json_mode: false,
        }
    }
}

/// Request to generate text
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Logical agent issuing the call (classifier, strategist, ...)
    pub agent: String,
    /// Ordered, role-tagged conversation
    pub messages: Vec<ChatMessage>,
    pub params: GenerationParams,
}

impl GenerationRequest {
    pub fn new(agent: impl Into<String>, messages: Vec<ChatMessage>, params: GenerationParams) -> Self {
        Self {
            agent: agent.into(),
            messages,
            params,
        }
    }
}

/// Raw provider output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

impl Generation {
    pub fn new(text: impl Into<String>, usage: Option<TokenUsage>) -> Self {
        Self {
            text: text.into(),
            usage,
        }
    }
}

/// Error types for generation calls
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Port trait for text-generation providers
///
/// Implementations make exactly one attempt per call: no retries, no
/// timeout beyond the transport's own.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Stable identifier, e.g. "anthropic", "openai", "mock"
    fn provider_id(&self) -> &str;

    /// Whether credentials are present; an unconfigured generator fails every call
    fn is_configured(&self) -> bool;

    async fn generate(&self, request: GenerationRequest) -> Result<Generation, GenerationError>;
}
