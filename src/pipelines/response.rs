use crate::category;
use crate::error::ImportError;
use crate::json_span::object_candidates;
use crate::model::{ExtractedRecipe, Ingredient, SourceType};
use crate::providers::NO_RECIPE_MARKER;
use crate::quantity::Quantity;
use log::{debug, warn};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const UNTITLED: &str = "Untitled Recipe";

/// Recipe as the provider writes it. Every field is optional and most accept
/// more than one shape.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderRecipe {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    servings: Option<Value>,
    #[serde(default, alias = "prep_time")]
    prep_time: Option<Value>,
    #[serde(default, alias = "cook_time")]
    cook_time: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    ingredients: Vec<ProviderIngredient>,
    #[serde(default, deserialize_with = "null_as_empty")]
    instructions: Vec<ProviderStep>,
    #[serde(default, alias = "imageURL", alias = "image")]
    image_url: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProviderIngredient {
    Structured {
        name: String,
        #[serde(default)]
        quantity: Option<Value>,
        #[serde(default)]
        unit: Option<String>,
        #[serde(default)]
        category: Option<String>,
        #[serde(default, alias = "isOptional")]
        optional: Option<bool>,
    },
    Line(String),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProviderStep {
    Text(String),
    Object { text: String },
    Other(Value),
}

/// Turn a provider reply into a canonical recipe for `source_url`.
///
/// The first `{...}` span that parses as a recipe object wins. An explicit
/// "no recipe" answer is a [`ImportError::NoRecipeFound`]; anything that
/// cannot be read is a [`ImportError::MalformedReply`] carrying the raw reply.
pub(crate) fn parse_reply(reply: &str, source_url: &str) -> Result<ExtractedRecipe, ImportError> {
    let parsed = object_candidates(reply).find_map(|candidate| {
        match serde_json::from_str::<ProviderRecipe>(candidate) {
            Ok(recipe) if recipe.is_meaningful() => Some(recipe),
            Ok(_) => None,
            Err(e) => {
                debug!("Skipping reply fragment that is not a recipe: {}", e);
                None
            }
        }
    });

    let Some(recipe) = parsed else {
        if reply.contains(NO_RECIPE_MARKER) {
            return Err(no_recipe(source_url));
        }
        warn!("Provider reply contained no readable JSON object");
        return Err(ImportError::MalformedReply {
            message: "the reply did not contain a recipe object".to_string(),
            raw: reply.to_string(),
        });
    };

    if let Some(error) = &recipe.error {
        if is_no_recipe_signal(error) {
            return Err(no_recipe(source_url));
        }
        let detail = value_text(error).unwrap_or_else(|| error.to_string());
        warn!("Provider reply carried an error: {}", detail);
        return Err(ImportError::MalformedReply {
            message: format!("the provider reported an error: {detail}"),
            raw: reply.to_string(),
        });
    }

    Ok(recipe.into_extracted(source_url))
}

fn is_no_recipe_signal(error: &Value) -> bool {
    error
        .as_str()
        .is_some_and(|text| text.to_lowercase().contains(&NO_RECIPE_MARKER.to_lowercase()))
}

/// Lists the provider wrote as `null` read as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn no_recipe(source_url: &str) -> ImportError {
    ImportError::NoRecipeFound {
        source_url: source_url.to_string(),
    }
}

impl ProviderRecipe {
    /// Whether the object is a recipe or an error signal rather than some
    /// unrelated fragment (a nested ingredient, an example in prose).
    fn is_meaningful(&self) -> bool {
        self.error.is_some()
            || self.title.is_some()
            || !self.ingredients.is_empty()
            || !self.instructions.is_empty()
    }

    fn into_extracted(self, source_url: &str) -> ExtractedRecipe {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let source_url = source_url.trim();
        ExtractedRecipe {
            title,
            servings: self.servings.as_ref().and_then(servings_count),
            prep_time: self.prep_time.as_ref().and_then(value_text),
            cook_time: self.cook_time.as_ref().and_then(value_text),
            ingredients: self
                .ingredients
                .into_iter()
                .filter_map(ProviderIngredient::into_ingredient)
                .collect(),
            instructions: self
                .instructions
                .into_iter()
                .filter_map(ProviderStep::into_text)
                .collect(),
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
            source_url: (!source_url.is_empty()).then(|| source_url.to_string()),
            source_type: SourceType::from_url(source_url),
        }
    }
}

impl ProviderIngredient {
    fn into_ingredient(self) -> Option<Ingredient> {
        match self {
            ProviderIngredient::Structured {
                name,
                quantity,
                unit,
                category,
                optional,
            } => {
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                let unit = unit
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty());
                let quantity = quantity
                    .as_ref()
                    .and_then(value_text)
                    .map(|raw| Quantity::parse(&raw));
                Some(Ingredient {
                    name: name.to_string(),
                    quantity,
                    unit,
                    category: category::normalize(category.as_deref()),
                    is_optional: optional.unwrap_or(false),
                })
            }
            ProviderIngredient::Line(line) => {
                let line = line.trim();
                (!line.is_empty()).then(|| Ingredient::new(line))
            }
            ProviderIngredient::Other(value) => {
                debug!("Ignoring ingredient entry {}", value);
                None
            }
        }
    }
}

impl ProviderStep {
    fn into_text(self) -> Option<String> {
        let text = match self {
            ProviderStep::Text(text) | ProviderStep::Object { text } => text,
            ProviderStep::Other(_) => return None,
        };
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Strings stay as they are, numbers are printed, everything else is absent.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `4`, `"4"` and `"4 servings"` all mean four.
fn servings_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        }
        Value::Array(items) => items.first().and_then(servings_count),
        _ => None,
    }
}
