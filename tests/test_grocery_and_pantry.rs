use chrono::{Duration, TimeZone, Utc};
use recipe_ingest::grocery::consolidate;
use recipe_ingest::pantry::{expiring_items, missing_ingredients, rank};
use recipe_ingest::{Category, PantryItem, Recipe, RecipeId};
use serde_json::json;

fn saved_recipe(id: &str, title: &str, ingredients: serde_json::Value) -> Recipe {
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "servings": 2,
        "prepTime": null,
        "cookTime": null,
        "ingredients": ingredients,
        "instructions": ["Cook"],
        "imageURL": null,
        "sourceURL": null,
        "sourceType": "manual"
    }))
    .unwrap()
}

fn garlic(count: &str) -> serde_json::Value {
    json!({
        "name": "garlic",
        "quantity": {"amount": count.parse::<f64>().unwrap(), "unit": "clove", "rawText": format!("{count} clove")},
        "unit": "clove",
        "category": "Produce",
        "isOptional": false
    })
}

#[test]
fn test_consolidating_two_recipes_with_garlic() {
    let recipes = vec![
        saved_recipe("r1", "Aglio e olio", json!([garlic("1")])),
        saved_recipe("r2", "Garlic bread", json!([garlic("1")])),
    ];

    let items = consolidate(&recipes);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "garlic");
    assert_eq!(items[0].quantity.as_ref().unwrap().amount, Some(2.0));
    assert_eq!(items[0].category, Category::Produce);
    assert_eq!(items[0].source_recipe_ids.len(), 2);
    assert!(items[0].source_recipe_ids.contains(&RecipeId::from("r2")));

    let body = serde_json::to_value(&items).unwrap();
    assert_eq!(body[0]["sourceRecipeIds"], json!(["r1", "r2"]));
    assert_eq!(body[0]["category"], "Produce");
}

#[test]
fn test_ranking_against_pantry() {
    let recipes = vec![
        saved_recipe(
            "stew",
            "Beef stew",
            json!([{"name": "beef", "quantity": null, "unit": null}, {"name": "carrots", "quantity": null, "unit": null}]),
        ),
        saved_recipe(
            "toast",
            "Garlic toast",
            json!([{"name": "Bread", "quantity": null, "unit": null}, {"name": "garlic", "quantity": null, "unit": null}]),
        ),
    ];
    let pantry = vec![
        PantryItem::new("sourdough bread"),
        PantryItem::new("Garlic cloves"),
        PantryItem::new("carrots"),
    ];

    let ranked = rank(&recipes, &pantry);
    assert_eq!(ranked[0].recipe.id, RecipeId::from("toast"));
    assert_eq!(ranked[0].match_percentage, 100);
    assert_eq!(ranked[1].match_percentage, 50);
    assert_eq!(ranked[1].missing_count, 1);

    let missing = missing_ingredients(&recipes[0], &pantry);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].name, "beef");

    let ranked = rank(&recipes, &[]);
    assert_eq!(ranked.len(), 2);
    assert!(ranked.iter().all(|r| r.match_percentage == 0));
}

#[test]
fn test_pantry_items_from_json() {
    let now = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();
    let pantry: Vec<PantryItem> = serde_json::from_value(json!([
        {"name": "milk", "quantity": "1", "unit": "l", "category": "dairy", "expirationDate": "2026-05-02T08:00:00Z"},
        {"name": "flour", "quantity": null, "unit": null, "category": "Baking", "expirationDate": null}
    ]))
    .unwrap();

    assert_eq!(pantry[0].category, Category::DairyEggs);
    let soon = expiring_items(&pantry, now, Duration::days(2));
    assert_eq!(soon.len(), 1);
    assert_eq!(soon[0].name, "milk");
}
