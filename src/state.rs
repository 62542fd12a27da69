use std::sync::Arc;
use crate::service::RecipeService;
use crate::users::MemoryUserStore;
// app's shared state

pub struct AppState {
    pub recipes: Arc<RecipeService>,
    pub users: Arc<MemoryUserStore>, // ingredient and preference records
}
