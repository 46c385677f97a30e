use crate::transcript::DEFAULT_TRANSCRIPTION_BASE_URL;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Provider used when a request does not name one
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Third-party transcription service (TikTok / Instagram)
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    /// Request timeout in seconds, applied by the HTTP client
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent with page fetches
    pub user_agent: Option<String>,
}

/// Configuration for a specific AI provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier (e.g., "gpt-4o-mini", "claude-sonnet-4-5")
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key (can also be set via the provider's environment variable)
    pub api_key: Option<String>,
    /// Base URL for the API endpoint (for proxies or tests)
    pub base_url: Option<String>,
    /// Request timeout in seconds; the top-level `timeout` when unset
    pub timeout: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranscriptionConfig {
    /// API key for the transcription service; falls back to TRANSCRIPT_API_KEY
    pub api_key: Option<String>,
    #[serde(default = "default_transcription_base_url")]
    pub base_url: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_transcription_base_url(),
        }
    }
}

impl TranscriptionConfig {
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("TRANSCRIPT_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl ProviderConfig {
    /// An enabled provider section with default settings for `model`
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            enabled: default_enabled(),
            model: model.into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
            timeout: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
            transcription: TranscriptionConfig::default(),
            timeout: default_timeout(),
            user_agent: None,
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "openai".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_timeout() -> u64 {
    30
}

fn default_transcription_base_url() -> String {
    DEFAULT_TRANSCRIPTION_BASE_URL.to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_INGEST__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_INGEST__PROVIDERS__OPENAI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE_INGEST__PROVIDERS__OPENAI__API_KEY
        .add_source(
            Environment::with_prefix("RECIPE_INGEST")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_values() {
        assert_eq!(default_provider(), "openai");
        assert_eq!(default_timeout(), 30);
        assert!(default_enabled());

        let config = AppConfig::default();
        assert!(config.providers.is_empty());
        assert_eq!(config.transcription.base_url, "https://api.supadata.ai/v1");
        assert_eq!(config.timeout_duration(), Duration::from_secs(30));
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml = r#"
            default_provider = "anthropic"
            timeout = 45

            [providers.anthropic]
            model = "claude-sonnet-4-5"
            api_key = "sk-test"
            timeout = 60

            [providers.openai]
            enabled = false
            model = "gpt-4o-mini"

            [transcription]
            api_key = "transcribe-key"
        "#;

        let config: AppConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.default_provider, "anthropic");
        assert_eq!(config.timeout, 45);
        let anthropic = &config.providers["anthropic"];
        assert!(anthropic.enabled);
        assert_eq!(anthropic.max_tokens, 4000);
        assert_eq!(anthropic.api_key.as_deref(), Some("sk-test"));
        assert_eq!(anthropic.timeout, Some(60));
        assert!(!config.providers["openai"].enabled);
        assert_eq!(config.providers["openai"].timeout, None);
        assert_eq!(
            config.transcription.resolved_api_key().as_deref(),
            Some("transcribe-key")
        );
        assert_eq!(config.transcription.base_url, DEFAULT_TRANSCRIPTION_BASE_URL);
    }

    #[test]
    fn test_load_config_without_file() {
        let config = load_config().unwrap();
        if std::env::var("RECIPE_INGEST__DEFAULT_PROVIDER").is_err() {
            assert_eq!(config.default_provider, "openai");
        }
        if std::env::var("RECIPE_INGEST__TIMEOUT").is_err() {
            assert_eq!(config.timeout, 30);
        }
    }
}
