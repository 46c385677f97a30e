use super::metadata::PageMetadata;
use html_escape::decode_html_entities;
use log::{debug, warn};
use scraper::{Html, Selector};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Recipe fields read from an embedded schema.org `Recipe` record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredRecipe {
    pub title: Option<String>,
    pub servings: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub image_url: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: Option<String>,
    #[serde(rename = "contentUrl")]
    content_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    String(String),
    Multiple(Vec<ImageType>),
    Object(ImageObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    String(String),
    Multiple(Vec<Value>),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeYield {
    String(String),
    Number(f64),
    Multiple(Vec<RecipeYield>),
    Other(Value),
}

impl ImageType {
    fn first_url(&self) -> Option<String> {
        match self {
            ImageType::String(url) => Some(url.clone()),
            ImageType::Multiple(images) => images.first().and_then(ImageType::first_url),
            ImageType::Object(image) => image.url.clone().or_else(|| image.content_url.clone()),
            ImageType::Other(_) => None,
        }
        .map(|url| decode_html_symbols(&url))
        .filter(|url| !url.is_empty())
    }
}

impl RecipeYield {
    fn first(&self) -> Option<String> {
        match self {
            RecipeYield::String(s) => Some(s.trim().to_string()),
            RecipeYield::Number(n) if n.fract() == 0.0 => Some(format!("{}", *n as i64)),
            RecipeYield::Number(n) => Some(n.to_string()),
            RecipeYield::Multiple(values) => values.first().and_then(RecipeYield::first),
            RecipeYield::Other(_) => None,
        }
        .filter(|s| !s.is_empty())
    }
}

impl RecipeIngredients {
    fn lines(&self) -> Vec<String> {
        let lines: Vec<String> = match self {
            RecipeIngredients::String(text) => text.lines().map(str::to_string).collect(),
            RecipeIngredients::Multiple(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(obj) => obj
                        .get("text")
                        .or_else(|| obj.get("name"))
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => None,
                })
                .collect(),
            RecipeIngredients::Other(_) => Vec::new(),
        };
        lines
            .iter()
            .map(|line| clean_text(line))
            .filter(|line| !line.is_empty())
            .collect()
    }
}

impl StructuredRecipe {
    /// Read the recipe fields of a JSON-LD `Recipe` node, using page
    /// metadata for a missing title or image.
    pub fn from_json_ld(value: &Value, metadata: &PageMetadata) -> StructuredRecipe {
        let title = value
            .get("name")
            .and_then(Value::as_str)
            .map(clean_text)
            .filter(|name| !name.is_empty())
            .or_else(|| metadata.title.clone());

        let image_url = field::<ImageType>(value, &["image"])
            .and_then(|image| image.first_url())
            .or_else(|| metadata.image_url.clone());

        let mut instructions = Vec::new();
        if let Some(steps) = value.get("recipeInstructions") {
            collect_steps(steps, &mut instructions);
        }

        StructuredRecipe {
            title,
            servings: field::<RecipeYield>(value, &["recipeYield", "yield"])
                .and_then(|recipe_yield| recipe_yield.first()),
            prep_time: duration_field(value.get("prepTime")),
            cook_time: duration_field(value.get("cookTime")),
            image_url,
            ingredients: field::<RecipeIngredients>(value, &["recipeIngredient", "ingredients"])
                .map(|ingredients| ingredients.lines())
                .unwrap_or_default(),
            instructions,
        }
    }

    /// Plain-text rendering handed to the AI provider in place of the page.
    pub fn to_digest(&self) -> String {
        let mut lines = Vec::new();
        let fields = [
            ("Title", &self.title),
            ("Servings", &self.servings),
            ("Prep Time", &self.prep_time),
            ("Cook Time", &self.cook_time),
            ("Image", &self.image_url),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                lines.push(format!("{label}: {value}"));
            }
        }

        lines.push(String::new());
        lines.push("Ingredients:".to_string());
        lines.extend(self.ingredients.iter().cloned());

        lines.push(String::new());
        lines.push("Instructions:".to_string());
        lines.extend(
            self.instructions
                .iter()
                .enumerate()
                .map(|(index, step)| format!("{}. {}", index + 1, step)),
        );

        lines.join("\n")
    }
}

/// Parse every JSON-LD block in the document and return the first `Recipe`
/// node found. Blocks that are not valid JSON are skipped.
pub fn find_recipe_in_document(document: &Html) -> Option<Value> {
    let Ok(selector) = Selector::parse("script[type='application/ld+json']") else {
        return None;
    };

    for (index, script) in document.select(&selector).enumerate() {
        let raw_json = script.text().collect::<String>();
        match serde_json::from_str::<Value>(raw_json.trim()) {
            Ok(json_ld) => {
                if let Some(recipe) = find_recipe(&json_ld) {
                    debug!("JsonLd: found recipe in script {}", index);
                    return Some(recipe.clone());
                }
                debug!("JsonLd: no recipe in script {}", index);
            }
            Err(e) => {
                warn!("JsonLd: skipping unparseable script {}: {}", index, e);
            }
        }
    }
    None
}

/// Depth-first search for the first node whose `@type` is or contains
/// `Recipe`. Descends into arrays, `@graph` containers and `mainEntity`.
pub fn find_recipe(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_recipe),
        Value::Object(map) => {
            if is_recipe_type(value) {
                return Some(value);
            }
            ["@graph", "mainEntity"]
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(find_recipe)
        }
        _ => None,
    }
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(kind)) => kind.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|kind| kind.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

/// Flatten `recipeInstructions` into ordered step texts. Steps may be plain
/// strings, `HowToStep` objects or `HowToSection` groups of steps.
fn collect_steps(value: &Value, steps: &mut Vec<String>) {
    match value {
        Value::String(text) => steps.extend(
            text.lines()
                .map(clean_text)
                .filter(|line| !line.is_empty()),
        ),
        Value::Array(items) => items.iter().for_each(|item| collect_steps(item, steps)),
        Value::Object(map) => {
            if let Some(children) = map.get("itemListElement") {
                collect_steps(children, steps);
                return;
            }
            let text = map
                .get("text")
                .and_then(Value::as_str)
                .or_else(|| map.get("name").and_then(Value::as_str))
                .map(clean_text);
            if let Some(text) = text.filter(|t| !t.is_empty()) {
                steps.push(text);
            }
        }
        _ => {}
    }
}

/// Read the first of `keys` present on the node as `T`. Legacy spellings
/// come after the schema.org name, so a node carrying both keeps the newer one.
fn field<T: DeserializeOwned>(node: &Value, keys: &[&str]) -> Option<T> {
    let (key, raw) = keys
        .iter()
        .find_map(|key| node.get(*key).filter(|v| !v.is_null()).map(|v| (*key, v)))?;
    serde_json::from_value(raw.clone())
        .map_err(|e| warn!("JSON-LD field {} has unexpected shape: {}", key, e))
        .ok()
}

fn duration_field(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(humanize_duration)
}

fn clean_text(text: &str) -> String {
    decode_html_symbols(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_html_symbols(text: &str) -> String {
    // some sites double-encode entities
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

/// Convert an ISO-8601 time duration (`PT1H30M`) into words
/// (`1 hour 30 minutes`). Anything else is returned unchanged.
pub fn humanize_duration(duration: &str) -> String {
    match iso_minutes(duration) {
        Some(total) => {
            let hours = total / 60;
            let minutes = total % 60;
            let mut parts = Vec::new();
            if hours > 0 {
                parts.push(format!("{} hour{}", hours, if hours == 1 { "" } else { "s" }));
            }
            if minutes > 0 || hours == 0 {
                parts.push(format!(
                    "{} minute{}",
                    minutes,
                    if minutes == 1 { "" } else { "s" }
                ));
            }
            parts.join(" ")
        }
        None => duration.to_string(),
    }
}

fn iso_minutes(duration: &str) -> Option<u64> {
    let rest = duration
        .strip_prefix("PT")
        .or_else(|| duration.strip_prefix("pt"))?;
    if rest.is_empty() {
        return None;
    }

    let mut seconds = 0.0;
    let mut number = String::new();
    for c in rest.chars() {
        match c {
            '0'..='9' | '.' => number.push(c),
            'H' | 'h' | 'M' | 'm' | 'S' | 's' => {
                let value: f64 = number.parse().ok()?;
                number.clear();
                seconds += match c.to_ascii_uppercase() {
                    'H' => value * 3600.0,
                    'M' => value * 60.0,
                    _ => value,
                };
            }
            _ => return None,
        }
    }
    if !number.is_empty() {
        return None;
    }
    Some((seconds / 60.0).round() as u64)
}
