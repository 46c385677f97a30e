//! Extraction orchestration: pick a source strategy for a URL, hand the
//! prepared text to the AI provider and read its reply.

mod response;
pub mod text;
pub mod url;

use crate::builder::RecipeExtractorBuilder;
use crate::config::AppConfig;
use crate::error::ImportError;
use crate::model::ExtractedRecipe;
use crate::providers::{LlmProvider, PAGE_PROMPT, TRANSCRIPT_PROMPT};
use crate::transcript::{Platform, TranscriptExtractor};
use crate::url_to_text::fetchers::Fetcher;
use log::{debug, info, warn};
use std::sync::Arc;

pub use url::PageContent;

/// Text prepared for the provider together with the instruction to use.
struct SourceContent {
    text: String,
    system_prompt: &'static str,
    image_url: Option<String>,
}

/// Turns URLs and transcripts into canonical recipes.
///
/// Holds no per-request state; one extractor can serve concurrent requests.
pub struct RecipeExtractor {
    fetcher: Arc<dyn Fetcher>,
    transcripts: TranscriptExtractor,
}

impl RecipeExtractor {
    pub fn new(fetcher: Arc<dyn Fetcher>, transcripts: TranscriptExtractor) -> Self {
        Self {
            fetcher,
            transcripts,
        }
    }

    pub fn builder() -> RecipeExtractorBuilder {
        RecipeExtractorBuilder::default()
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ImportError> {
        RecipeExtractorBuilder::from_config(config).build()
    }

    pub fn transcripts(&self) -> &TranscriptExtractor {
        &self.transcripts
    }

    /// Extract a recipe from a web page or video URL.
    pub async fn extract(
        &self,
        provider: &dyn LlmProvider,
        url: &str,
    ) -> Result<ExtractedRecipe, ImportError> {
        self.extract_with_key(provider, url, None).await
    }

    /// Like [`extract`](Self::extract), with a transcription-service key that
    /// overrides the configured one.
    pub async fn extract_with_key(
        &self,
        provider: &dyn LlmProvider,
        url: &str,
        transcription_api_key: Option<&str>,
    ) -> Result<ExtractedRecipe, ImportError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ImportError::InvalidInput("URL is required".to_string()));
        }

        let content = self.source_content(url, transcription_api_key).await?;
        self.complete(provider, url, content).await
    }

    /// Extract a recipe from a transcript the caller already has.
    pub async fn extract_from_transcript(
        &self,
        provider: &dyn LlmProvider,
        url: &str,
        transcript: &str,
    ) -> Result<ExtractedRecipe, ImportError> {
        if transcript.trim().is_empty() {
            return Err(ImportError::InvalidInput(
                "Transcript text is required".to_string(),
            ));
        }
        let content = SourceContent {
            text: text::transcript_content(transcript),
            system_prompt: TRANSCRIPT_PROMPT,
            image_url: None,
        };
        self.complete(provider, url.trim(), content).await
    }

    async fn source_content(
        &self,
        url: &str,
        transcription_api_key: Option<&str>,
    ) -> Result<SourceContent, ImportError> {
        let platform = Platform::detect(url);
        if !platform.is_video() {
            let page = url::page_content(self.fetcher.as_ref(), url).await?;
            return Ok(SourceContent {
                text: page.text,
                system_prompt: PAGE_PROMPT,
                image_url: page.image_url,
            });
        }

        info!("{} is a {} video, fetching transcript", url, platform);
        match self
            .transcripts
            .fetch_for_platform(url, platform, transcription_api_key)
            .await
        {
            Ok(transcript) => Ok(SourceContent {
                text: text::transcript_content(&transcript),
                system_prompt: TRANSCRIPT_PROMPT,
                image_url: None,
            }),
            Err(e) if e.is_credential() => Err(e),
            Err(e) if platform.needs_transcription_service() => {
                warn!(
                    "{} transcript unavailable ({}), reading {} as a web page",
                    platform, e, url
                );
                let page = url::page_content(self.fetcher.as_ref(), url).await?;
                Ok(SourceContent {
                    text: page.text,
                    system_prompt: TRANSCRIPT_PROMPT,
                    image_url: page.image_url,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn complete(
        &self,
        provider: &dyn LlmProvider,
        url: &str,
        content: SourceContent,
    ) -> Result<ExtractedRecipe, ImportError> {
        info!(
            "Sending {} characters to {}",
            content.text.chars().count(),
            provider.provider_name()
        );
        let reply = provider
            .complete(content.system_prompt, &content.text)
            .await?;
        debug!("Provider reply: {}", reply);

        let mut recipe = response::parse_reply(&reply, url)?;
        if recipe.image_url.is_none() {
            recipe.image_url = content.image_url;
        }
        Ok(recipe)
    }
}
