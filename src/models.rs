use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Owned ingredient, identity is (name, category)
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub category: String,
}

// Cooking preferences, unknown fields pass through to the generator
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub cooking_equipment: Vec<String>,
    #[serde(default)]
    pub cooking_methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Ingredient as required by a recipe
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct RecipeIngredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Value>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<f64>,
    // derived per caller on every read, never trusted from the wire
    #[serde(default, skip_deserializing)]
    pub missing_ingredients: Vec<String>,
}

// Unit returned by the generator and stored in the cache
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ScoredRecipe {
    pub recipe: Recipe,
    #[serde(default)]
    pub score: f64,
}

// Body posted to the generator
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest<'a> {
    pub user_ingredients: &'a [String],
    pub user_preferences: &'a Preferences,
}
