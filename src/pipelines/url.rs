use crate::error::ImportError;
use crate::url_to_text::fetchers::Fetcher;
use crate::url_to_text::html::extractors::{find_recipe_in_document, PageMetadata, StructuredRecipe};
use crate::url_to_text::text::reduce_html;
use log::{debug, info};
use scraper::Html;

/// Text of a web page prepared for the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    /// Structured digest or reduced plain text
    pub text: String,
    /// Image found in structured data or page metadata
    pub image_url: Option<String>,
    /// Whether `text` is a structured digest
    pub structured: bool,
}

/// Fetch `url` and prepare its content.
pub async fn page_content(fetcher: &dyn Fetcher, url: &str) -> Result<PageContent, ImportError> {
    let html = fetcher.fetch(url).await?;
    let content = read_page(&html);
    if content.structured {
        info!("Using structured recipe data from {}", url);
    } else {
        info!("No structured recipe on {}, using page text", url);
    }
    Ok(content)
}

/// Prefer the embedded structured recipe, otherwise reduce the whole page
/// to plain text. Raw markup is never returned.
pub fn read_page(html: &str) -> PageContent {
    let document = Html::parse_document(html);
    let metadata = PageMetadata::from_document(&document);

    if let Some(value) = find_recipe_in_document(&document) {
        let recipe = StructuredRecipe::from_json_ld(&value, &metadata);
        debug!("Structured recipe: {:?}", recipe);
        return PageContent {
            text: recipe.to_digest(),
            image_url: recipe.image_url.clone(),
            structured: true,
        };
    }

    PageContent {
        text: reduce_html(html),
        image_url: metadata.image_url,
        structured: false,
    }
}
