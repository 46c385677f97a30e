use super::Platform;
use crate::error::{retry_after_secs, ImportError};
use log::{debug, info};
use reqwest::{Client, Url};
use serde::Deserialize;

pub const DEFAULT_TRANSCRIPTION_BASE_URL: &str = "https://api.supadata.ai/v1";

const SERVICE_NAME: &str = "transcription service";

/// Client for the third-party transcription service used for TikTok and
/// Instagram videos.
pub struct TranscriptionService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptPayload {
    #[serde(alias = "transcript")]
    content: TranscriptContent,
}

/// The service answers either with timed segments or with one flat string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranscriptContent {
    Segments(Vec<TranscriptSegment>),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct TranscriptSegment {
    text: String,
}

impl TranscriptContent {
    fn joined(self) -> String {
        let text = match self {
            TranscriptContent::Segments(segments) => segments
                .into_iter()
                .map(|segment| segment.text)
                .collect::<Vec<_>>()
                .join(" "),
            TranscriptContent::Text(text) => text,
        };
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl TranscriptionService {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Transcribe `url`. A missing key fails before any request is made.
    pub async fn fetch(
        &self,
        url: &str,
        platform: Platform,
        api_key: Option<&str>,
    ) -> Result<String, ImportError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .or(self.api_key.as_deref())
            .ok_or_else(|| ImportError::MissingApiKey {
                service: SERVICE_NAME.to_string(),
                platform: Some(platform),
            })?;

        let endpoint = Url::parse_with_params(
            &format!("{}/transcript", self.base_url.trim_end_matches('/')),
            &[("url", url), ("text", "false")],
        )
        .map_err(|e| ImportError::Config(format!("Invalid transcription service URL: {e}")))?;

        info!("Requesting {} transcript from {}", platform, SERVICE_NAME);
        let response = self
            .client
            .get(endpoint.clone())
            .header("x-api-key", api_key)
            .send()
            .await
            .map_err(|e| ImportError::from_reqwest(e, endpoint.as_str()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_secs(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(ImportError::from_status(SERVICE_NAME, status, retry_after, body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ImportError::from_reqwest(e, endpoint.as_str()))?;
        debug!("Transcription service response: {}", body);

        let payload: TranscriptPayload =
            serde_json::from_str(&body).map_err(|e| ImportError::Transcript {
                platform,
                url: url.to_string(),
                message: format!("unexpected transcription service response: {e}"),
            })?;

        let transcript = payload.content.joined();
        if transcript.is_empty() {
            return Err(ImportError::Transcript {
                platform,
                url: url.to_string(),
                message: "the transcription service returned no text".to_string(),
            });
        }
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use mockito::Matcher;

    const VIDEO: &str = "https://www.tiktok.com/@chef/video/123";

    fn service(base_url: String, key: Option<&str>) -> TranscriptionService {
        TranscriptionService::new(Client::new(), base_url, key.map(str::to_string))
    }

    #[tokio::test]
    async fn test_segments_are_joined() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/transcript")
            .match_query(Matcher::UrlEncoded("url".into(), VIDEO.into()))
            .match_header("x-api-key", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content":[{"text":"Chop the onion","offset":0},{"text":" then fry it","offset":1200}],"lang":"en"}"#)
            .create_async()
            .await;

        let transcript = service(server.url(), Some("secret"))
            .fetch(VIDEO, Platform::Tiktok, None)
            .await
            .unwrap();
        assert_eq!(transcript, "Chop the onion then fry it");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_flat_text_and_key_override() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/transcript")
            .match_query(Matcher::Any)
            .match_header("x-api-key", "from-request")
            .with_status(200)
            .with_body(r#"{"content":"Whisk eggs.\nAdd milk."}"#)
            .create_async()
            .await;

        let transcript = service(server.url(), Some("from-config"))
            .fetch(VIDEO, Platform::Instagram, Some("from-request"))
            .await
            .unwrap();
        assert_eq!(transcript, "Whisk eggs. Add milk.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = service(server.url(), None)
            .fetch(VIDEO, Platform::Tiktok, Some("   "))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ImportError::MissingApiKey {
                platform: Some(Platform::Tiktok),
                ..
            }
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/transcript")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error":"invalid key"}"#)
            .create_async()
            .await;

        let err = service(server.url(), Some("bad"))
            .fetch(VIDEO, Platform::Tiktok, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Credential);
    }

    #[tokio::test]
    async fn test_empty_transcript_is_transcript_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/transcript")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"content":[]}"#)
            .create_async()
            .await;

        let err = service(server.url(), Some("k"))
            .fetch(VIDEO, Platform::Tiktok, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transcript);
    }
}
