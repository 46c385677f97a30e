use super::Fetcher;
use crate::error::{retry_after_secs, ImportError};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Build the HTTP client shared by every outbound request of an extractor.
///
/// The timeout belongs to the transport; a request that exceeds it surfaces
/// as [`ImportError::Timeout`].
pub fn build_client(timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Client, ImportError> {
    let timeout = timeout.unwrap_or(Duration::from_secs(30));
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
        .build()
        .map_err(|e| ImportError::Config(format!("Failed to create HTTP client: {e}")))
}

pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, ImportError> {
        Ok(Self {
            client: build_client(timeout, None)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for RequestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ImportError> {
        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImportError::from_reqwest(e, url))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_secs(response.headers());
            if status.is_server_error() || status.as_u16() == 429 {
                let host = reqwest::Url::parse(url)
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_string))
                    .unwrap_or_else(|| url.to_string());
                return Err(ImportError::from_status(&host, status, retry_after, String::new()));
            }
            return Err(ImportError::Network {
                url: url.to_string(),
                message: format!("HTTP {status}"),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ImportError::from_reqwest(e, url))
    }
}
