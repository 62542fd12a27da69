use std::collections::HashSet;
use crate::models::Recipe;

// Fill in `missing_ingredients` for every recipe against the caller's current inventory.
// Matching is case-insensitive, output keeps the recipe's ingredient order.
pub fn annotate<S: AsRef<str>>(mut recipes: Vec<Recipe>, owned: &[S]) -> Vec<Recipe> {
    let owned: HashSet<String> = owned
        .iter()
        .map(|name| name.as_ref().trim().to_lowercase())
        .collect();

    for recipe in &mut recipes {
        recipe.missing_ingredients = recipe
            .ingredients
            .iter()
            .filter(|ingredient| !owned.contains(&ingredient.name.trim().to_lowercase()))
            .map(|ingredient| ingredient.name.clone())
            .collect();
    }
    recipes
}
