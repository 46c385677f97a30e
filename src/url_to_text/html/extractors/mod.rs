mod json_ld;
mod metadata;

pub use json_ld::{find_recipe, find_recipe_in_document, humanize_duration, StructuredRecipe};
pub use metadata::PageMetadata;
