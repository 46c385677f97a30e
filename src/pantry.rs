//! Matching saved recipes against what is on hand.

use crate::model::{Ingredient, PantryItem, RankedRecipe, Recipe};
use chrono::{DateTime, Duration, Utc};

/// Score every recipe against the pantry, best match first.
///
/// Ties on match percentage go to the recipe missing fewer ingredients;
/// remaining ties keep the input order. A recipe without ingredients scores 0.
pub fn rank<'a>(recipes: &'a [Recipe], pantry: &[PantryItem]) -> Vec<RankedRecipe<'a>> {
    let names = pantry_names(pantry);
    let mut ranked: Vec<RankedRecipe<'a>> = recipes
        .iter()
        .map(|recipe| score(recipe, &names))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| {
        b.match_percentage
            .cmp(&a.match_percentage)
            .then(a.missing_count.cmp(&b.missing_count))
    });
    ranked
}

/// Ingredients of `recipe` with no pantry counterpart, in recipe order.
pub fn missing_ingredients<'a>(recipe: &'a Recipe, pantry: &[PantryItem]) -> Vec<&'a Ingredient> {
    let names = pantry_names(pantry);
    recipe
        .ingredients()
        .iter()
        .filter(|ingredient| !is_present(ingredient, &names))
        .collect()
}

/// Items that have not expired yet but will within `within` of `now`,
/// soonest first.
pub fn expiring_items<'a>(
    pantry: &'a [PantryItem],
    now: DateTime<Utc>,
    within: Duration,
) -> Vec<&'a PantryItem> {
    let horizon = now + within;
    let mut items: Vec<&PantryItem> = pantry
        .iter()
        .filter(|item| {
            item.expiration_date
                .is_some_and(|date| date > now && date <= horizon)
        })
        .collect();
    items.sort_by_key(|item| item.expiration_date);
    items
}

fn score<'a>(recipe: &'a Recipe, names: &[String]) -> RankedRecipe<'a> {
    let total = recipe.ingredients().len();
    let present = recipe
        .ingredients()
        .iter()
        .filter(|ingredient| is_present(ingredient, names))
        .count();

    let match_percentage = if total == 0 {
        0
    } else {
        (100.0 * present as f64 / total as f64).round() as u8
    };

    RankedRecipe {
        recipe,
        match_percentage,
        missing_count: total - present,
    }
}

fn pantry_names(pantry: &[PantryItem]) -> Vec<String> {
    pantry
        .iter()
        .map(|item| item.name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Containment in either direction, so "garlic" matches "garlic cloves".
fn is_present(ingredient: &Ingredient, pantry_names: &[String]) -> bool {
    let key = ingredient.key();
    if key.is_empty() {
        return false;
    }
    pantry_names
        .iter()
        .any(|name| name.contains(&key) || key.contains(name.as_str()))
}
