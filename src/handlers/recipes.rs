use axum::{Json, extract::State};
use std::sync::Arc;
use std::time::Instant;
use crate::errors::RecipeError;
use crate::handlers::CallerId;
use crate::metrics::{REQUEST_LATENCY, REQUEST_TOTAL};
use crate::models::Recipe;
use crate::state::AppState;

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
) -> Result<Json<Vec<Recipe>>, RecipeError> {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    let result = state.recipes.generate_recipes(&user_id).await;

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    result.map(Json)
}
