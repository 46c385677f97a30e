#![allow(dead_code)]

use async_trait::async_trait;
use recipe_ingest::url_to_text::fetchers::Fetcher;
use recipe_ingest::{ImportError, LlmProvider};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Provider that answers every prompt with a canned reply and remembers
/// what it was asked.
pub struct RecordingProvider {
    reply: String,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingProvider {
    pub fn new(reply: &str) -> Self {
        RecordingProvider {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(system, content)` of every call so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for RecordingProvider {
    fn provider_name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, system: &str, content: &str) -> Result<String, ImportError> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), content.to_string()));
        Ok(self.reply.clone())
    }
}

/// Fetcher serving fixed pages by URL.
#[derive(Default)]
pub struct PageMap {
    pages: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl PageMap {
    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for PageMap {
    async fn fetch(&self, url: &str) -> Result<String, ImportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.pages.get(url).cloned().ok_or_else(|| ImportError::Network {
            url: url.to_string(),
            message: "HTTP 404 Not Found".to_string(),
        })
    }
}

pub const RECIPE_REPLY: &str = r#"{
    "title": "Pancakes",
    "servings": 4,
    "prepTime": "10 minutes",
    "cookTime": "15 minutes",
    "ingredients": [
        {"name": "flour", "quantity": "2", "unit": "cups", "category": "pantry"},
        {"name": "egg", "quantity": "1", "unit": null, "category": "Dairy and Eggs"}
    ],
    "instructions": ["Mix", "Cook"]
}"#;
