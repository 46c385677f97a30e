use crate::config::{AppConfig, ProviderConfig};
use crate::error::ImportError;
use crate::providers::{AnthropicProvider, GoogleProvider, LlmProvider, OpenAIProvider};

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn LlmProvider>, ImportError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(ImportError::Config(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        match provider_name {
            "openai" => Ok(Box::new(OpenAIProvider::new(config)?)),
            "anthropic" => Ok(Box::new(AnthropicProvider::new(config)?)),
            "google" => Ok(Box::new(GoogleProvider::new(config)?)),
            _ => Err(ImportError::Config(format!(
                "Unknown provider: {}",
                provider_name
            ))),
        }
    }

    /// Build the configured default provider.
    ///
    /// A provider with no configuration section runs on its default model,
    /// taking the API key from the environment.
    pub fn from_config(config: &AppConfig) -> Result<Box<dyn LlmProvider>, ImportError> {
        Self::named(config, &config.default_provider)
    }

    /// Build `provider_name` using its section of `config`, if any.
    ///
    /// A section without its own timeout inherits the top-level one.
    pub fn named(config: &AppConfig, provider_name: &str) -> Result<Box<dyn LlmProvider>, ImportError> {
        Self::create(provider_name, &Self::provider_config(config, provider_name)?)
    }

    fn provider_config(config: &AppConfig, provider_name: &str) -> Result<ProviderConfig, ImportError> {
        let mut provider_config = match config.providers.get(provider_name) {
            Some(provider_config) => provider_config.clone(),
            None => {
                let model = Self::default_model(provider_name).ok_or_else(|| {
                    ImportError::Config(format!("Unknown provider: {}", provider_name))
                })?;
                ProviderConfig::for_model(model)
            }
        };
        provider_config.timeout.get_or_insert(config.timeout);
        Ok(provider_config)
    }

    /// Model used when configuration does not name one
    pub fn default_model(provider_name: &str) -> Option<&'static str> {
        match provider_name {
            "openai" => Some("gpt-4o-mini"),
            "anthropic" => Some("claude-sonnet-4-5"),
            "google" => Some("gemini-2.0-flash"),
            _ => None,
        }
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["openai", "anthropic", "google"]
    }
}
