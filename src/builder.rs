use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::pipelines::RecipeExtractor;
use crate::transcript::{TranscriptExtractor, TranscriptionService, DEFAULT_TRANSCRIPTION_BASE_URL};
use crate::url_to_text::fetchers::{build_client, Fetcher, RequestFetcher};
use crate::ImportError;

/// Builder for configuring a [`RecipeExtractor`]
#[derive(Default)]
pub struct RecipeExtractorBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transcription_api_key: Option<String>,
    transcription_base_url: Option<String>,
    fetcher: Option<Arc<dyn Fetcher>>,
}

impl RecipeExtractorBuilder {
    /// Start from the transport and transcription settings of `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        RecipeExtractorBuilder {
            timeout: Some(config.timeout_duration()),
            user_agent: config.user_agent.clone(),
            transcription_api_key: config.transcription.resolved_api_key(),
            transcription_base_url: Some(config.transcription.base_url.clone()),
            fetcher: None,
        }
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use recipe_ingest::RecipeExtractor;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeExtractor::builder()
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the user agent sent with page and caption fetches
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the API key for the transcription service used for TikTok and
    /// Instagram videos.
    ///
    /// # Example
    /// ```
    /// use recipe_ingest::RecipeExtractor;
    ///
    /// let builder = RecipeExtractor::builder()
    ///     .transcription_api_key("your-api-key");
    /// ```
    pub fn transcription_api_key(mut self, key: impl Into<String>) -> Self {
        self.transcription_api_key = Some(key.into());
        self
    }

    pub fn transcription_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.transcription_base_url = Some(base_url.into());
        self
    }

    /// Replace the page fetcher, e.g. with one that renders JavaScript.
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Build the extractor
    ///
    /// # Errors
    /// Returns [`ImportError::Config`] if the HTTP client cannot be created.
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_ingest::{ProviderFactory, RecipeExtractor};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let extractor = RecipeExtractor::builder().build()?;
    /// let provider = ProviderFactory::from_config(&Default::default())?;
    /// let recipe = extractor
    ///     .extract(provider.as_ref(), "https://example.com/recipe")
    ///     .await?;
    /// println!("{}", recipe.title);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<RecipeExtractor, ImportError> {
        let client = build_client(self.timeout, self.user_agent.as_deref())?;
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(RequestFetcher::with_client(client.clone())),
        };
        let service = TranscriptionService::new(
            client,
            self.transcription_base_url
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_BASE_URL.to_string()),
            self.transcription_api_key,
        );

        Ok(RecipeExtractor::new(
            fetcher.clone(),
            TranscriptExtractor::new(fetcher, service),
        ))
    }
}
