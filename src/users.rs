use async_trait::async_trait;
use dashmap::DashMap;
use crate::errors::{RecipeError, RecipeResult};
use crate::models::{Ingredient, Preferences};

// Upstream record collaborator resolving a caller to their inventory and preferences
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn owned_ingredients(&self, user_id: &str) -> RecipeResult<Vec<Ingredient>>;
    async fn preferences(&self, user_id: &str) -> RecipeResult<Preferences>;
}

#[derive(Default, Clone)]
struct UserRecord {
    ingredients: Vec<Ingredient>,
    preference: Option<Preferences>,
}

// Plain in-memory record storage
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<String, UserRecord>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    // returns false when the user already existed
    pub fn register(&self, user_id: &str) -> bool {
        if self.users.contains_key(user_id) {
            return false;
        }
        self.users.insert(user_id.to_string(), UserRecord::default());
        true
    }

    pub fn add_ingredients(
        &self,
        user_id: &str,
        ingredients: Vec<Ingredient>,
    ) -> RecipeResult<Vec<Ingredient>> {
        let mut user = self.record_mut(user_id)?;
        user.ingredients.extend(ingredients);
        Ok(user.ingredients.clone())
    }

    // Remove by (name, category); returns the removed ingredients
    pub fn remove_ingredients(
        &self,
        user_id: &str,
        targets: &[Ingredient],
    ) -> RecipeResult<Vec<Ingredient>> {
        let mut user = self.record_mut(user_id)?;
        let (removed, kept): (Vec<_>, Vec<_>) = user
            .ingredients
            .drain(..)
            .partition(|ingredient| targets.contains(ingredient));
        user.ingredients = kept;

        if removed.is_empty() {
            return Err(RecipeError::IngredientNotFound);
        }
        Ok(removed)
    }

    pub fn cooking_preference(&self, user_id: &str) -> RecipeResult<Preferences> {
        let user = self
            .users
            .get(user_id)
            .ok_or_else(|| RecipeError::UserNotFound(user_id.to_string()))?;
        user.preference.clone().ok_or(RecipeError::PreferenceNotFound)
    }

    pub fn save_cooking_preference(
        &self,
        user_id: &str,
        preference: Preferences,
    ) -> RecipeResult<Preferences> {
        let mut user = self.record_mut(user_id)?;
        user.preference = Some(preference.clone());
        Ok(preference)
    }

    pub fn delete_cooking_preference(&self, user_id: &str) -> RecipeResult<()> {
        let mut user = self.record_mut(user_id)?;
        user.preference
            .take()
            .map(|_| ())
            .ok_or(RecipeError::PreferenceNotFound)
    }

    fn record_mut(
        &self,
        user_id: &str,
    ) -> RecipeResult<dashmap::mapref::one::RefMut<'_, String, UserRecord>> {
        self.users
            .get_mut(user_id)
            .ok_or_else(|| RecipeError::UserNotFound(user_id.to_string()))
    }
}

#[async_trait]
impl UserDirectory for MemoryUserStore {
    async fn owned_ingredients(&self, user_id: &str) -> RecipeResult<Vec<Ingredient>> {
        self.users
            .get(user_id)
            .map(|user| user.ingredients.clone())
            .ok_or_else(|| RecipeError::UserNotFound(user_id.to_string()))
    }

    // a known user without a saved preference gets the defaults
    async fn preferences(&self, user_id: &str) -> RecipeResult<Preferences> {
        self.users
            .get(user_id)
            .map(|user| user.preference.clone().unwrap_or_default())
            .ok_or_else(|| RecipeError::UserNotFound(user_id.to_string()))
    }
}
