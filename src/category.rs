use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Grocery-store aisle an ingredient belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Produce,
    MeatSeafood,
    DairyEggs,
    Bakery,
    Pantry,
    Frozen,
    Beverages,
    CondimentsSauces,
    SpicesSeasonings,
    #[default]
    Other,
}

/// Lowercase labels accepted for each category. `" and "` is folded to
/// `" & "` before lookup, so only the ampersand spelling is listed.
const SYNONYMS: &[(&str, Category)] = &[
    ("produce", Category::Produce),
    ("fresh produce", Category::Produce),
    ("fruit", Category::Produce),
    ("fruits", Category::Produce),
    ("vegetable", Category::Produce),
    ("vegetables", Category::Produce),
    ("fruits & vegetables", Category::Produce),
    ("fresh herbs", Category::Produce),
    ("meat & seafood", Category::MeatSeafood),
    ("meat", Category::MeatSeafood),
    ("meats", Category::MeatSeafood),
    ("seafood", Category::MeatSeafood),
    ("fish", Category::MeatSeafood),
    ("poultry", Category::MeatSeafood),
    ("protein", Category::MeatSeafood),
    ("dairy & eggs", Category::DairyEggs),
    ("dairy", Category::DairyEggs),
    ("eggs", Category::DairyEggs),
    ("cheese", Category::DairyEggs),
    ("bakery", Category::Bakery),
    ("bread", Category::Bakery),
    ("baked goods", Category::Bakery),
    ("pantry", Category::Pantry),
    ("dry goods", Category::Pantry),
    ("canned goods", Category::Pantry),
    ("grains", Category::Pantry),
    ("pasta & grains", Category::Pantry),
    ("baking", Category::Pantry),
    ("frozen", Category::Frozen),
    ("frozen foods", Category::Frozen),
    ("beverages", Category::Beverages),
    ("beverage", Category::Beverages),
    ("drinks", Category::Beverages),
    ("condiments & sauces", Category::CondimentsSauces),
    ("condiments", Category::CondimentsSauces),
    ("condiment", Category::CondimentsSauces),
    ("sauces", Category::CondimentsSauces),
    ("sauce", Category::CondimentsSauces),
    ("oils & vinegars", Category::CondimentsSauces),
    ("spices & seasonings", Category::SpicesSeasonings),
    ("spices", Category::SpicesSeasonings),
    ("spice", Category::SpicesSeasonings),
    ("seasonings", Category::SpicesSeasonings),
    ("seasoning", Category::SpicesSeasonings),
    ("herbs & spices", Category::SpicesSeasonings),
    ("other", Category::Other),
];

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Produce,
        Category::MeatSeafood,
        Category::DairyEggs,
        Category::Bakery,
        Category::Pantry,
        Category::Frozen,
        Category::Beverages,
        Category::CondimentsSauces,
        Category::SpicesSeasonings,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Produce => "Produce",
            Category::MeatSeafood => "Meat & Seafood",
            Category::DairyEggs => "Dairy & Eggs",
            Category::Bakery => "Bakery",
            Category::Pantry => "Pantry",
            Category::Frozen => "Frozen",
            Category::Beverages => "Beverages",
            Category::CondimentsSauces => "Condiments & Sauces",
            Category::SpicesSeasonings => "Spices & Seasonings",
            Category::Other => "Other",
        }
    }
}

/// Map a free-form category label onto the canonical set.
///
/// Matching ignores case, surrounding whitespace and `and`/`&` spelling.
/// Unknown or missing labels become [`Category::Other`].
pub fn normalize(label: Option<&str>) -> Category {
    let Some(label) = label else {
        return Category::Other;
    };
    let key = label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .replace(" and ", " & ");

    SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(normalize(label.as_deref()))
    }
}
