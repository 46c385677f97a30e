//! Grocery-list consolidation across several recipes.

use crate::model::{ConsolidatedGroceryItem, Ingredient, Recipe};
use crate::quantity::Quantity;
use std::collections::{BTreeSet, HashMap};

/// Merge the ingredients of `recipes` into one grocery list.
///
/// Ingredients are grouped by lowercase, trimmed name. Quantities of a group
/// are combined in recipe order and the contributing recipe ids are
/// collected. The category of the first ingredient seen wins. Items come out
/// in the order their name was first seen.
pub fn consolidate(recipes: &[Recipe]) -> Vec<ConsolidatedGroceryItem> {
    let mut items: Vec<ConsolidatedGroceryItem> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for recipe in recipes {
        for ingredient in recipe.ingredients() {
            let key = ingredient.key();
            if key.is_empty() {
                continue;
            }

            match index.get(&key) {
                Some(&position) => {
                    let item = &mut items[position];
                    item.quantity = merge(item.quantity.take(), ingredient.effective_quantity());
                    item.unit = unit_of(item.quantity.as_ref(), item.unit.take());
                    item.source_recipe_ids.insert(recipe.id.clone());
                }
                None => {
                    index.insert(key.clone(), items.len());
                    items.push(new_item(key, ingredient, recipe));
                }
            }
        }
    }

    items
}

fn new_item(name: String, ingredient: &Ingredient, recipe: &Recipe) -> ConsolidatedGroceryItem {
    let quantity = ingredient.effective_quantity().filter(|q| !q.is_empty());
    let unit = unit_of(quantity.as_ref(), ingredient.unit.clone());
    ConsolidatedGroceryItem {
        name,
        quantity,
        unit,
        category: ingredient.category,
        source_recipe_ids: BTreeSet::from([recipe.id.clone()]),
    }
}

fn merge(current: Option<Quantity>, next: Option<Quantity>) -> Option<Quantity> {
    match (current, next) {
        (Some(current), Some(next)) => Some(current.combine(&next)),
        (current, next) => current.or(next).filter(|q| !q.is_empty()),
    }
}

/// The unit of a numeric quantity, or `fallback` while there is no quantity.
/// A quantity whose amounts could not be summed carries its units in its text.
fn unit_of(quantity: Option<&Quantity>, fallback: Option<String>) -> Option<String> {
    match quantity {
        Some(q) if q.amount.is_some() => q.unit.clone(),
        Some(_) => None,
        None => fallback,
    }
}
