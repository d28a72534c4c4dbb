use serde::{Deserialize, Serialize};

/// Main configuration structure for rivalscope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Text-generation provider settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Per-agent sampling parameters
    #[serde(default)]
    pub agents: AgentsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Generation-call trace log
    #[serde(default)]
    pub trace: TraceConfig,

    /// Where finished pipeline traces are written
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Supported text-generation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Messages API
    Anthropic,
    /// Any OpenAI-compatible chat completions endpoint
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Anthropic => "https://api.anthropic.com",
            Self::OpenAi => "https://api.openai.com",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Anthropic => "claude-sonnet-4-5",
            Self::OpenAi => "gpt-4o",
        }
    }

    /// Environment variable consulted when no API key is configured
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl Default for ProviderKind {
    fn default() -> Self {
        Self::Anthropic
    }
}

/// Text-generation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    /// Overrides the provider's default endpoint
    #[serde(default)]
    pub base_url: Option<String>,

    /// Overrides the provider's default model
    #[serde(default)]
    pub model: Option<String>,

    /// Anthropic API version header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Falls back to the provider's environment variable when unset
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

const fn default_timeout_secs() -> u64 {
    120
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: None,
            model: None,
            api_version: default_api_version(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GenerationConfig {
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.provider.default_base_url().to_string())
    }

    pub fn effective_model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    /// API key from config or the provider's environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(self.provider.api_key_env()).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Sampling parameters for one agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl AgentParams {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// Sampling parameters for every agent in the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AgentsConfig {
    #[serde(default = "default_classifier")]
    pub classifier: AgentParams,
    #[serde(default = "default_strategist")]
    pub strategist: AgentParams,
    #[serde(default = "default_red_team")]
    pub red_team: AgentParams,
    #[serde(default = "default_scenario_predictor")]
    pub scenario_predictor: AgentParams,
    #[serde(default = "default_verifier")]
    pub verifier: AgentParams,
    #[serde(default = "default_contradiction_detector")]
    pub contradiction_detector: AgentParams,
    #[serde(default = "default_quality_arbiter")]
    pub quality_arbiter: AgentParams,
}

const fn default_classifier() -> AgentParams {
    AgentParams::new(0.2, 4096)
}

const fn default_strategist() -> AgentParams {
    AgentParams::new(0.4, 8192)
}

const fn default_red_team() -> AgentParams {
    AgentParams::new(0.6, 4096)
}

const fn default_scenario_predictor() -> AgentParams {
    AgentParams::new(0.7, 4096)
}

const fn default_verifier() -> AgentParams {
    AgentParams::new(0.2, 4096)
}

const fn default_contradiction_detector() -> AgentParams {
    AgentParams::new(0.3, 4096)
}

const fn default_quality_arbiter() -> AgentParams {
    AgentParams::new(0.3, 8192)
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            classifier: default_classifier(),
            strategist: default_strategist(),
            red_team: default_red_team(),
            scenario_predictor: default_scenario_predictor(),
            verifier: default_verifier(),
            contradiction_detector: default_contradiction_detector(),
            quality_arbiter: default_quality_arbiter(),
        }
    }
}

impl AgentsConfig {
    /// All agents with their names, for validation and display
    pub fn named(&self) -> [(&'static str, AgentParams); 7] {
        [
            ("classifier", self.classifier),
            ("strategist", self.strategist),
            ("red_team", self.red_team),
            ("scenario_predictor", self.scenario_predictor),
            ("verifier", self.verifier),
            ("contradiction_detector", self.contradiction_detector),
            ("quality_arbiter", self.quality_arbiter),
        ]
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation for file output: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Generation-call trace configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TraceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// JSON-lines file the trace events are appended to
    #[serde(default = "default_trace_path")]
    pub path: String,
}

const fn default_true() -> bool {
    true
}

fn default_trace_path() -> String {
    ".rivalscope/trace.jsonl".to_string()
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_trace_path(),
        }
    }
}

/// Digest storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageConfig {
    #[serde(default = "default_digest_dir")]
    pub digest_dir: String,
}

fn default_digest_dir() -> String {
    ".rivalscope/digests".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            digest_dir: default_digest_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.provider, ProviderKind::Anthropic);
        assert_eq!(config.effective_base_url(), "https://api.anthropic.com");
        assert_eq!(config.effective_model(), "claude-sonnet-4-5");
    }

    #[test]
    fn test_explicit_overrides_win() {
        let config = GenerationConfig {
            provider: ProviderKind::OpenAi,
            base_url: Some("http://localhost:8080".to_string()),
            model: Some("local-model".to_string()),
            ..Default::default()
        };
        assert_eq!(config.effective_base_url(), "http://localhost:8080");
        assert_eq!(config.effective_model(), "local-model");
    }

    #[test]
    fn test_blank_configured_key_falls_through_to_env() {
        let config = GenerationConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        temp_env::with_var("ANTHROPIC_API_KEY", Some("from-env"), || {
            assert_eq!(config.resolve_api_key().as_deref(), Some("from-env"));
        });
        temp_env::with_var_unset("ANTHROPIC_API_KEY", || {
            assert!(config.resolve_api_key().is_none());
        });
    }

    #[test]
    fn test_provider_yaml_names() {
        let config: GenerationConfig = serde_yaml::from_str("provider: openai\n").unwrap();
        assert_eq!(config.provider, ProviderKind::OpenAi);
    }
}
