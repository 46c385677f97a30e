mod anthropic;
mod factory;
mod google;
mod open_ai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::{NO_RECIPE_MARKER, PAGE_PROMPT, TRANSCRIPT_PROMPT};

use crate::error::{retry_after_secs, ImportError};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Provider calls give up after this many seconds unless configured otherwise.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// An AI provider: takes a system instruction and user content and returns
/// the model's reply text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &str;

    async fn complete(&self, system: &str, content: &str) -> Result<String, ImportError>;
}

/// HTTP client for provider calls, bounded by `timeout_secs`.
pub(crate) fn http_client(timeout_secs: Option<u64>) -> Result<Client, ImportError> {
    let timeout = Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS));
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ImportError::Config(format!("Failed to create HTTP client: {e}")))
}

/// Check the status of a provider response and decode its JSON body.
pub(crate) async fn read_json_response(
    provider: &str,
    endpoint: &str,
    response: reqwest::Response,
) -> Result<Value, ImportError> {
    let status = response.status();
    if !status.is_success() {
        let retry_after = retry_after_secs(response.headers());
        let body = response.text().await.unwrap_or_default();
        debug!("{} responded with {}: {}", provider, status, body);
        return Err(ImportError::from_status(provider, status, retry_after, body));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| ImportError::from_reqwest(e, endpoint))?;
    debug!("{:?}", body);
    Ok(body)
}

/// Pull the reply text out of a decoded provider response.
pub(crate) fn reply_text(body: &Value, pointer: &str, provider: &str) -> Result<String, ImportError> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ImportError::MalformedReply {
            message: format!("Failed to extract content from {provider} response"),
            raw: body.to_string(),
        })
}
