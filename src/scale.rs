//! Serving-size scaling of whole recipes.

use crate::error::ImportError;
use crate::model::ExtractedRecipe;
use log::warn;

impl ExtractedRecipe {
    /// Scale every ingredient quantity and the servings count by `factor`.
    ///
    /// Servings are rounded to the nearest whole serving, never below one.
    /// A non-positive or non-finite factor returns the recipe unchanged.
    pub fn scaled(&self, factor: f64) -> ExtractedRecipe {
        if !factor.is_finite() || factor <= 0.0 {
            warn!("Ignoring invalid scale factor {factor}");
            return self.clone();
        }

        let mut recipe = self.clone();
        recipe.servings = self
            .servings
            .map(|servings| ((servings as f64 * factor).round() as u32).max(1));
        for ingredient in &mut recipe.ingredients {
            ingredient.quantity = ingredient.quantity.as_ref().map(|q| q.scale(factor));
        }
        recipe
    }

    /// Scale the recipe so that it serves `target`.
    pub fn scale_to_servings(&self, target: u32) -> Result<ExtractedRecipe, ImportError> {
        if target == 0 {
            return Err(ImportError::InvalidInput(
                "Target servings must be at least 1".to_string(),
            ));
        }
        let current = self.servings.filter(|s| *s > 0).ok_or_else(|| {
            ImportError::InvalidInput(format!(
                "Cannot scale \"{}\": servings are unknown",
                self.title
            ))
        })?;

        let mut recipe = self.scaled(target as f64 / current as f64);
        recipe.servings = Some(target);
        Ok(recipe)
    }
}
