pub mod annotate;
pub mod cache;
pub mod config;
pub mod errors;
pub mod generator;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod service;
pub mod state;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use crate::handlers::*;
use crate::state::AppState;

// creating the router with routes
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/recipes/generate", post(generate_handler))
        .route("/users", post(register_handler))
        .route("/user/ingredients", get(list_ingredients_handler))
        .route("/user/ingredients/create", post(create_ingredients_handler))
        .route(
            "/user/ingredients/delete",
            axum::routing::delete(delete_ingredients_handler),
        )
        .route(
            "/user/cooking-preference",
            get(get_cooking_preference_handler)
                .post(save_cooking_preference_handler)
                .delete(delete_cooking_preference_handler),
        )
        .with_state(state)
}
