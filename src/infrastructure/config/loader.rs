use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_LOG_FORMATS: [&str; 2] = ["json", "pretty"];
const VALID_ROTATIONS: [&str; 3] = ["daily", "hourly", "never"];

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Invalid temperature for agent '{agent}': {value}. Must be between 0.0 and 2.0")]
    InvalidTemperature { agent: &'static str, value: f32 },

    #[error("Invalid max_tokens for agent '{0}': must be at least 1")]
    InvalidMaxTokens(&'static str),

    #[error("Invalid timeout_secs: must be at least 1")]
    InvalidTimeout,

    #[error("generation.{0} cannot be empty when set")]
    EmptyGenerationField(&'static str),

    #[error("trace.path cannot be empty while tracing is enabled")]
    EmptyTracePath,

    #[error("storage.digest_dir cannot be empty")]
    EmptyDigestDir,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .rivalscope/config.yaml (project config)
    /// 3. .rivalscope/local.yaml (project local overrides, optional)
    /// 4. Environment variables (RIVALSCOPE_* prefix, `__` separates nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("RIVALSCOPE_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".rivalscope/config.yaml"))
            .merge(Yaml::file(".rivalscope/local.yaml"))
            .merge(Env::prefixed("RIVALSCOPE_").split("__"))
    }

    /// Validate configuration after loading
    ///
    /// A missing API key is not an error: the generator reports itself
    /// unconfigured and every call falls back.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let logging = &config.logging;
        if !VALID_LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(logging.level.clone()));
        }
        if !VALID_LOG_FORMATS.contains(&logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(logging.format.clone()));
        }
        if !VALID_ROTATIONS.contains(&logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(logging.rotation.clone()));
        }

        for (agent, params) in config.agents.named() {
            if !(0.0..=2.0).contains(&params.temperature) {
                return Err(ConfigError::InvalidTemperature {
                    agent,
                    value: params.temperature,
                });
            }
            if params.max_tokens == 0 {
                return Err(ConfigError::InvalidMaxTokens(agent));
            }
        }

        let generation = &config.generation;
        if generation.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if generation.base_url.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(ConfigError::EmptyGenerationField("base_url"));
        }
        if generation.model.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(ConfigError::EmptyGenerationField("model"));
        }
        if generation.api_version.trim().is_empty() {
            return Err(ConfigError::EmptyGenerationField("api_version"));
        }

        if config.trace.enabled && config.trace.path.trim().is_empty() {
            return Err(ConfigError::EmptyTracePath);
        }
        if config.storage.digest_dir.trim().is_empty() {
            return Err(ConfigError::EmptyDigestDir);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::ProviderKind;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.trace.path, ".rivalscope/trace.jsonl");
        assert_eq!(config.storage.digest_dir, ".rivalscope/digests");
        assert!((config.agents.classifier.temperature - 0.2).abs() < f32::EPSILON);
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
generation:
  provider: openai
  model: gpt-4o-mini
  timeout_secs: 30
agents:
  strategist:
    temperature: 0.5
    max_tokens: 2048
logging:
  level: debug
  format: json
trace:
  enabled: false
  path: ''
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.generation.provider, ProviderKind::OpenAi);
        assert_eq!(config.generation.effective_model(), "gpt-4o-mini");
        assert_eq!(config.generation.timeout_secs, 30);
        assert_eq!(config.agents.strategist.max_tokens, 2048);
        assert_eq!(config.agents.verifier.max_tokens, 4096, "unlisted agents keep defaults");
        assert_eq!(config.logging.format, "json");
        assert!(!config.trace.enabled);

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(f)) if f == "xml"
        ));
    }

    #[test]
    fn test_validate_invalid_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRotation(_))
        ));
    }

    #[test]
    fn test_validate_temperature_out_of_range() {
        let mut config = Config::default();
        config.agents.red_team.temperature = 2.5;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTemperature { agent: "red_team", .. })
        ));
    }

    #[test]
    fn test_validate_zero_max_tokens() {
        let mut config = Config::default();
        config.agents.quality_arbiter.max_tokens = 0;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxTokens("quality_arbiter"))
        ));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.generation.timeout_secs = 0;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTimeout)
        ));
    }

    #[test]
    fn test_validate_empty_model_override() {
        let mut config = Config::default();
        config.generation.model = Some("  ".to_string());

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyGenerationField("model"))
        ));
    }

    #[test]
    fn test_validate_trace_path_only_required_when_enabled() {
        let mut config = Config::default();
        config.trace.path = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyTracePath)
        ));

        config.trace.enabled = false;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_missing_api_key_is_not_an_error() {
        temp_env::with_var_unset("ANTHROPIC_API_KEY", || {
            let config = Config::default();
            assert!(config.generation.resolve_api_key().is_none());
            assert!(ConfigLoader::validate(&config).is_ok());
        });
    }

    #[test]
    fn test_env_override() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "logging:\n  level: info\n  format: json").unwrap();
        file.flush().unwrap();

        temp_env::with_vars(
            [
                ("RIVALSCOPE_LOGGING__LEVEL", Some("debug")),
                ("RIVALSCOPE_AGENTS__VERIFIER__MAX_TOKENS", Some("1024")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.logging.level, "debug", "Env should win over file");
                assert_eq!(config.logging.format, "json", "File value should persist");
                assert_eq!(config.agents.verifier.max_tokens, 1024);
            },
        );
    }

    #[test]
    fn test_hierarchical_merging() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "generation:\n  timeout_secs: 60\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(
            override_file,
            "generation:\n  timeout_secs: 15\nlogging:\n  level: debug"
        )
        .unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.generation.timeout_secs, 15, "Override should win");
        assert_eq!(
            config.logging.level, "debug",
            "Override should win for nested fields"
        );
        assert_eq!(
            config.logging.format, "json",
            "Base value should persist when not overridden"
        );
    }
}
