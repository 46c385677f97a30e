//! Request and response shapes of the extraction and transcript endpoints,
//! with the mapping from errors to HTTP statuses. The HTTP server itself
//! lives outside this crate.

use crate::error::ImportError;
use crate::model::ExtractedRecipe;
use crate::pipelines::RecipeExtractor;
use crate::providers::LlmProvider;
use crate::transcript::Platform;
use log::{info, warn};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRequest {
    pub url: String,
    #[serde(default)]
    pub is_transcript: Option<bool>,
    #[serde(default)]
    pub transcript: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptRequest {
    pub url: String,
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub third_party_api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub transcript: String,
    pub platform: Platform,
}

/// HTTP error response format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl From<&ImportError> for ErrorResponse {
    fn from(error: &ImportError) -> Self {
        ErrorResponse {
            error: error.user_message(),
            suggestion: Some(error.suggestion()),
        }
    }
}

/// Run an extraction request and produce `(status, body)`.
pub async fn handle_extraction(
    extractor: &RecipeExtractor,
    provider: &dyn LlmProvider,
    request: &ExtractionRequest,
) -> (u16, Value) {
    match extract(extractor, provider, request).await {
        Ok(recipe) => ok_body(&recipe),
        Err(e) => {
            warn!("Extraction of {} failed: {}", request.url, e);
            error_body(e.http_status(), &e)
        }
    }
}

/// Run a transcript request and produce `(status, body)`.
///
/// A missing key or an unsupported platform is the caller's mistake (400);
/// everything else is reported as 500.
pub async fn handle_transcript(
    extractor: &RecipeExtractor,
    request: &TranscriptRequest,
) -> (u16, Value) {
    match transcript(extractor, request).await {
        Ok(response) => ok_body(&response),
        Err(e) => {
            warn!("Transcript of {} failed: {}", request.url, e);
            let status = match e {
                ImportError::InvalidInput(_) | ImportError::MissingApiKey { .. } => 400,
                _ => 500,
            };
            error_body(status, &e)
        }
    }
}

async fn extract(
    extractor: &RecipeExtractor,
    provider: &dyn LlmProvider,
    request: &ExtractionRequest,
) -> Result<ExtractedRecipe, ImportError> {
    let url = validate_url(&request.url)?;

    if request.is_transcript.unwrap_or(false) {
        let transcript = request
            .transcript
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ImportError::InvalidInput("Transcript text is required".to_string())
            })?;
        info!("Extracting recipe from supplied transcript for {}", url);
        return extractor
            .extract_from_transcript(provider, url, transcript)
            .await;
    }

    extractor.extract(provider, url).await
}

async fn transcript(
    extractor: &RecipeExtractor,
    request: &TranscriptRequest,
) -> Result<TranscriptResponse, ImportError> {
    let url = validate_url(&request.url)?;
    let platform = request.platform.unwrap_or_else(|| Platform::detect(url));
    if !platform.is_video() {
        return Err(ImportError::InvalidInput(
            "A supported video platform is required".to_string(),
        ));
    }

    let transcript = extractor
        .transcripts()
        .fetch_for_platform(url, platform, request.third_party_api_key.as_deref())
        .await?;
    Ok(TranscriptResponse {
        transcript,
        platform,
    })
}

fn validate_url(url: &str) -> Result<&str, ImportError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ImportError::InvalidInput("URL is required".to_string()));
    }
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url),
        _ => Err(ImportError::InvalidInput(format!("{url} is not a web link"))),
    }
}

fn ok_body<T: Serialize>(body: &T) -> (u16, Value) {
    match serde_json::to_value(body) {
        Ok(value) => (200, value),
        Err(e) => error_body(500, &ImportError::Config(format!("Failed to encode response: {e}"))),
    }
}

fn error_body(status: u16, error: &ImportError) -> (u16, Value) {
    let body = serde_json::to_value(ErrorResponse::from(error))
        .unwrap_or_else(|_| serde_json::json!({ "error": error.to_string() }));
    (status, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url_to_text::fetchers::Fetcher;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NoNetwork;

    #[async_trait]
    impl Fetcher for NoNetwork {
        async fn fetch(&self, url: &str) -> Result<String, ImportError> {
            Err(ImportError::Network {
                url: url.to_string(),
                message: "offline".to_string(),
            })
        }
    }

    struct Reply(Result<String, u16>);

    #[async_trait]
    impl LlmProvider for Reply {
        fn provider_name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, _system: &str, _content: &str) -> Result<String, ImportError> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(ImportError::from_status(
                    "stub",
                    reqwest::StatusCode::from_u16(*status).unwrap(),
                    None,
                    String::new(),
                )),
            }
        }
    }

    fn extractor() -> RecipeExtractor {
        RecipeExtractor::builder()
            .fetcher(Arc::new(NoNetwork))
            .transcription_base_url("http://127.0.0.1:9")
            .build()
            .unwrap()
    }

    fn request(url: &str, transcript: Option<&str>) -> ExtractionRequest {
        ExtractionRequest {
            url: url.to_string(),
            is_transcript: transcript.map(|_| true),
            transcript: transcript.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_extraction_from_transcript() {
        let provider = Reply(Ok(r#"{"title": "Shakshuka", "servings": 2, "ingredients": [{"name": "eggs", "quantity": "4", "category": "Dairy & Eggs"}], "instructions": ["Simmer", "Crack eggs"]}"#.to_string()));
        let (status, body) = handle_extraction(
            &extractor(),
            &provider,
            &request("https://www.tiktok.com/@chef/video/1", Some("today we make shakshuka")),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["title"], "Shakshuka");
        assert_eq!(body["sourceType"], "tiktok");
        assert_eq!(body["sourceURL"], "https://www.tiktok.com/@chef/video/1");
        assert_eq!(body["ingredients"][0]["category"], "Dairy & Eggs");
    }

    #[tokio::test]
    async fn test_bad_requests_are_400() {
        let provider = Reply(Ok("{}".to_string()));
        let extractor = extractor();

        let (status, body) = handle_extraction(&extractor, &provider, &request("  ", None)).await;
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("URL is required"));

        let (status, _) =
            handle_extraction(&extractor, &provider, &request("ftp://example.com/x", None)).await;
        assert_eq!(status, 400);

        let (status, _) = handle_extraction(
            &extractor,
            &provider,
            &request("https://example.com/x", Some("   ")),
        )
        .await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_provider_statuses_pass_through() {
        let extractor = extractor();
        let url = "https://example.com/recipe";

        let (status, _) = handle_extraction(
            &extractor,
            &Reply(Err(401)),
            &request(url, Some("text")),
        )
        .await;
        assert_eq!(status, 401);

        let (status, body) = handle_extraction(
            &extractor,
            &Reply(Err(429)),
            &request(url, Some("text")),
        )
        .await;
        assert_eq!(status, 429);
        assert!(body["suggestion"].is_string());

        let (status, _) = handle_extraction(
            &extractor,
            &Reply(Ok(r#"{"error": "No recipe found"}"#.to_string())),
            &request(url, Some("text")),
        )
        .await;
        assert_eq!(status, 500);
    }

    #[tokio::test]
    async fn test_network_failure_is_500() {
        let (status, body) = handle_extraction(
            &extractor(),
            &Reply(Ok("{}".to_string())),
            &request("https://example.com/recipe", None),
        )
        .await;
        assert_eq!(status, 500);
        assert!(body["error"].as_str().unwrap().contains("example.com"));
    }

    #[tokio::test]
    async fn test_transcript_request_validation() {
        let extractor = extractor();

        let (status, _) = handle_transcript(
            &extractor,
            &TranscriptRequest {
                url: "https://example.com/not-a-video".to_string(),
                platform: None,
                third_party_api_key: None,
            },
        )
        .await;
        assert_eq!(status, 400);

        let (status, body) = handle_transcript(
            &extractor,
            &TranscriptRequest {
                url: "https://www.instagram.com/reel/abc/".to_string(),
                platform: Some(Platform::Instagram),
                third_party_api_key: None,
            },
        )
        .await;
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("Instagram"));
    }

    #[test]
    fn test_request_shapes() {
        let request: ExtractionRequest = serde_json::from_str(
            r#"{"url": "https://youtu.be/x", "isTranscript": true, "transcript": "hi"}"#,
        )
        .unwrap();
        assert_eq!(request.is_transcript, Some(true));

        let request: TranscriptRequest = serde_json::from_str(
            r#"{"url": "https://vm.tiktok.com/x", "platform": "tiktok", "thirdPartyApiKey": "k"}"#,
        )
        .unwrap();
        assert_eq!(request.platform, Some(Platform::Tiktok));
        assert_eq!(request.third_party_api_key.as_deref(), Some("k"));

        let response = TranscriptResponse {
            transcript: "text".to_string(),
            platform: Platform::Youtube,
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"transcript": "text", "platform": "youtube"})
        );
    }
}
