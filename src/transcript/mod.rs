//! Transcripts for recipe videos.
//!
//! YouTube captions are read straight from the watch page. TikTok and
//! Instagram have no public captions, so they go through a third-party
//! transcription service that needs a user-supplied API key.

mod service;
mod youtube;

pub use service::{TranscriptionService, DEFAULT_TRANSCRIPTION_BASE_URL};

use crate::error::ImportError;
use crate::url_to_text::fetchers::Fetcher;
use log::info;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Tiktok,
    Instagram,
    Unknown,
}

impl Platform {
    /// Classify a URL by its host name.
    pub fn detect(url: &str) -> Platform {
        let url = url.trim();
        let parsed = Url::parse(url).or_else(|_| Url::parse(&format!("https://{url}")));
        let Some(host) = parsed
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        else {
            return Platform::Unknown;
        };

        let on = |domain: &str| host == domain || host.ends_with(&format!(".{domain}"));
        if on("youtube.com") || on("youtu.be") || on("youtube-nocookie.com") {
            Platform::Youtube
        } else if on("tiktok.com") {
            Platform::Tiktok
        } else if on("instagram.com") {
            Platform::Instagram
        } else {
            Platform::Unknown
        }
    }

    pub fn is_video(&self) -> bool {
        !matches!(self, Platform::Unknown)
    }

    /// Whether a transcript for this platform comes from the paid service.
    pub fn needs_transcription_service(&self) -> bool {
        matches!(self, Platform::Tiktok | Platform::Instagram)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Youtube => "YouTube",
            Platform::Tiktok => "TikTok",
            Platform::Instagram => "Instagram",
            Platform::Unknown => "unknown",
        })
    }
}

pub struct TranscriptExtractor {
    fetcher: Arc<dyn Fetcher>,
    service: TranscriptionService,
}

impl TranscriptExtractor {
    pub fn new(fetcher: Arc<dyn Fetcher>, service: TranscriptionService) -> Self {
        Self { fetcher, service }
    }

    pub fn has_transcription_key(&self) -> bool {
        self.service.has_api_key()
    }

    /// Fetch the transcript of `url`, detecting the platform from its host.
    pub async fn fetch(&self, url: &str, api_key: Option<&str>) -> Result<String, ImportError> {
        self.fetch_for_platform(url, Platform::detect(url), api_key)
            .await
    }

    /// Fetch the transcript of `url` as a video on `platform`.
    ///
    /// `api_key` overrides the configured transcription-service key.
    pub async fn fetch_for_platform(
        &self,
        url: &str,
        platform: Platform,
        api_key: Option<&str>,
    ) -> Result<String, ImportError> {
        info!("Fetching {} transcript for {}", platform, url);
        match platform {
            Platform::Youtube => youtube::fetch_transcript(self.fetcher.as_ref(), url).await,
            Platform::Tiktok | Platform::Instagram => {
                self.service.fetch(url, platform, api_key).await
            }
            Platform::Unknown => Err(ImportError::InvalidInput(format!(
                "{url} is not a supported video link"
            ))),
        }
    }
}
