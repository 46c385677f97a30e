//! Recipe ingestion and ingredient reasoning.
//!
//! URLs (recipe pages, YouTube, TikTok and Instagram videos) and transcripts
//! are turned into canonical [`ExtractedRecipe`] values with the help of an
//! AI provider. Saved recipes can then be merged into a grocery list
//! ([`grocery::consolidate`]), scaled ([`ExtractedRecipe::scaled`]) and
//! ranked against a pantry ([`pantry::rank`]).

pub mod api;
pub mod builder;
pub mod category;
pub mod config;
pub mod error;
pub mod grocery;
mod json_span;
pub mod model;
pub mod pantry;
pub mod pipelines;
pub mod providers;
pub mod quantity;
pub mod scale;
pub mod transcript;
pub mod url_to_text;

pub use builder::RecipeExtractorBuilder;
pub use category::Category;
pub use config::AppConfig;
pub use error::{ErrorKind, ImportError};
pub use model::{
    ConsolidatedGroceryItem, ExtractedRecipe, Ingredient, PantryItem, RankedRecipe, Recipe,
    RecipeId, SourceType,
};
pub use pipelines::RecipeExtractor;
pub use providers::{LlmProvider, ProviderFactory};
pub use quantity::Quantity;
pub use transcript::Platform;

/// Extract a recipe from `url` with the configured default provider.
///
/// Configuration comes from `config.toml` and `RECIPE_INGEST__*` environment
/// variables.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), recipe_ingest::ImportError> {
/// let recipe = recipe_ingest::extract_recipe("https://example.com/pancakes").await?;
/// println!("{}", recipe.title);
/// # Ok(())
/// # }
/// ```
pub async fn extract_recipe(url: &str) -> Result<ExtractedRecipe, ImportError> {
    let config = AppConfig::load()?;
    let provider = ProviderFactory::from_config(&config)?;
    RecipeExtractor::from_config(&config)?
        .extract(provider.as_ref(), url)
        .await
}

/// Extract a recipe from `url` with the provider called `provider_name`.
pub async fn extract_recipe_with_provider(
    url: &str,
    provider_name: &str,
) -> Result<ExtractedRecipe, ImportError> {
    let config = AppConfig::load()?;
    let provider = ProviderFactory::named(&config, provider_name)?;
    RecipeExtractor::from_config(&config)?
        .extract(provider.as_ref(), url)
        .await
}

/// Fetch the transcript of a video URL.
///
/// `api_key` is the transcription-service key for TikTok and Instagram; it
/// overrides the configured one.
pub async fn fetch_transcript(url: &str, api_key: Option<&str>) -> Result<String, ImportError> {
    let config = AppConfig::load()?;
    RecipeExtractor::from_config(&config)?
        .transcripts()
        .fetch(url, api_key)
        .await
}
