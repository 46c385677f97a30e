mod request;

pub use request::{build_client, RequestFetcher, DEFAULT_USER_AGENT};

use crate::error::ImportError;
use async_trait::async_trait;

/// Retrieves the body of a page. Implemented over HTTP by [`RequestFetcher`];
/// tests substitute canned pages.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ImportError>;
}
