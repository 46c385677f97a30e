use crate::category::Category;
use crate::quantity::Quantity;
use crate::transcript::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Where an extracted recipe came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Url,
    Youtube,
    Tiktok,
    Instagram,
    Manual,
}

impl SourceType {
    /// Derive the source type from the host of `url`; an empty URL means
    /// the recipe was entered by hand.
    pub fn from_url(url: &str) -> SourceType {
        if url.trim().is_empty() {
            return SourceType::Manual;
        }
        match Platform::detect(url) {
            Platform::Youtube => SourceType::Youtube,
            Platform::Tiktok => SourceType::Tiktok,
            Platform::Instagram => SourceType::Instagram,
            Platform::Unknown => SourceType::Url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    pub quantity: Option<Quantity>,
    pub unit: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub is_optional: bool,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Ingredient {
            name: name.into(),
            quantity: None,
            unit: None,
            category: Category::Other,
            is_optional: false,
        }
    }

    /// Builder-style helper used mostly by tests and manual entry.
    pub fn with_quantity(mut self, raw: &str, unit: Option<&str>) -> Self {
        self.quantity = Some(Quantity::parse(raw));
        self.unit = unit.map(str::to_string);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// The quantity with the ingredient-level unit folded in.
    pub fn effective_quantity(&self) -> Option<Quantity> {
        self.quantity
            .clone()
            .map(|q| q.with_default_unit(self.unit.as_deref()))
    }

    /// Lowercase, trimmed name used to match ingredients with each other.
    pub fn key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match &self.quantity {
            Some(quantity) => quantity.format_with(self.unit.as_deref(), &self.name),
            None => self.name.trim().to_string(),
        };
        f.write_str(&text)?;
        if self.is_optional {
            f.write_str(" (optional)")?;
        }
        Ok(())
    }
}

/// Canonical recipe produced by one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecipe {
    pub title: String,
    pub servings: Option<u32>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    #[serde(rename = "sourceURL")]
    pub source_url: Option<String>,
    pub source_type: SourceType,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        RecipeId(id.to_string())
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A saved recipe: an extracted recipe plus the identifier it was stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    #[serde(flatten)]
    pub details: ExtractedRecipe,
}

impl Recipe {
    pub fn new(id: impl Into<RecipeId>, details: ExtractedRecipe) -> Self {
        Recipe {
            id: id.into(),
            details,
        }
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.details.ingredients
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedGroceryItem {
    pub name: String,
    pub quantity: Option<Quantity>,
    pub unit: Option<String>,
    pub category: Category,
    pub source_recipe_ids: BTreeSet<RecipeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryItem {
    pub name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
    #[serde(default)]
    pub category: Category,
    pub expiration_date: Option<DateTime<Utc>>,
}

impl PantryItem {
    pub fn new(name: impl Into<String>) -> Self {
        PantryItem {
            name: name.into(),
            quantity: None,
            unit: None,
            category: Category::Other,
            expiration_date: None,
        }
    }

    pub fn expires_at(mut self, date: DateTime<Utc>) -> Self {
        self.expiration_date = Some(date);
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date.is_some_and(|date| date <= now)
    }
}

/// A recipe scored against the current pantry. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecipe<'a> {
    pub recipe: &'a Recipe,
    pub match_percentage: u8,
    pub missing_count: usize,
}
