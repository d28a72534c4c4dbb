//! Generator registry and factory.

use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{GenerationConfig, ProviderKind};
use crate::domain::ports::TextGenerator;

use super::anthropic_api::{AnthropicApiConfig, AnthropicApiGenerator};
use super::mock::MockGenerator;
use super::openai_compat::{OpenAiCompatConfig, OpenAiCompatGenerator};

/// Builds text generators from the `generation` config section.
pub struct GeneratorRegistry {
    config: GenerationConfig,
}

impl GeneratorRegistry {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// Create a generator for the given provider, sharing endpoint settings
    /// from the configuration.
    pub fn create_by_kind(&self, kind: ProviderKind) -> DomainResult<Arc<dyn TextGenerator>> {
        let mut config = self.config.clone();
        if config.provider != kind {
            config.provider = kind;
            config.base_url = None;
            config.model = None;
        }

        let generator: Arc<dyn TextGenerator> = match kind {
            ProviderKind::Anthropic => Arc::new(AnthropicApiGenerator::new(
                AnthropicApiConfig::from_generation(&config),
            )?),
            ProviderKind::OpenAi => Arc::new(OpenAiCompatGenerator::new(
                OpenAiCompatConfig::from_generation(&config),
            )?),
        };

        if !generator.is_configured() {
            tracing::warn!(
                provider = kind.as_str(),
                env_var = kind.api_key_env(),
                "No API key configured; generation calls will return fallbacks"
            );
        }

        Ok(generator)
    }

    /// The generator selected by `generation.provider`.
    pub fn configured(&self) -> DomainResult<Arc<dyn TextGenerator>> {
        self.create_by_kind(self.config.provider)
    }

    /// Create a generator by provider name; `mock` yields an empty scripted mock.
    pub fn create(&self, provider: &str) -> Option<DomainResult<Arc<dyn TextGenerator>>> {
        match provider {
            "anthropic" => Some(self.create_by_kind(ProviderKind::Anthropic)),
            "openai" => Some(self.create_by_kind(ProviderKind::OpenAi)),
            "mock" => Some(Ok(Arc::new(MockGenerator::new()))),
            _ => None,
        }
    }

    pub fn available_types(&self) -> Vec<&'static str> {
        vec!["anthropic", "openai", "mock"]
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}
