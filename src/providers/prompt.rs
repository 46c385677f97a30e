/// System instruction for recipe web pages, whether they arrive as a
/// structured digest or as reduced plain text.
///
/// Loaded from `page_prompt.txt` at compile time.
pub const PAGE_PROMPT: &str = include_str!("page_prompt.txt");

/// System instruction for video transcripts (and for the page text used when
/// a video has no transcript).
pub const TRANSCRIPT_PROMPT: &str = include_str!("transcript_prompt.txt");

/// Marker the prompts ask the provider to use when there is no recipe.
pub const NO_RECIPE_MARKER: &str = "No recipe found";
