use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use crate::errors::RecipeError;
use crate::handlers::CallerId;
use crate::models::{Ingredient, Preferences};
use crate::state::AppState;
use crate::users::UserDirectory;

type JsonResult<T> = Result<Json<T>, RecipeError>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_id: String,
}

pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> StatusCode {
    if state.users.register(&payload.user_id) {
        StatusCode::CREATED
    } else {
        StatusCode::CONFLICT
    }
}

pub async fn list_ingredients_handler(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
) -> JsonResult<Vec<Ingredient>> {
    state.users.owned_ingredients(&user_id).await.map(Json)
}

pub async fn create_ingredients_handler(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
    Json(payload): Json<Vec<Ingredient>>,
) -> JsonResult<Vec<Ingredient>> {
    state.users.add_ingredients(&user_id, payload).map(Json)
}

pub async fn delete_ingredients_handler(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
    Json(payload): Json<Vec<Ingredient>>,
) -> JsonResult<Vec<Ingredient>> {
    state.users.remove_ingredients(&user_id, &payload).map(Json)
}

pub async fn get_cooking_preference_handler(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
) -> JsonResult<Preferences> {
    state.users.cooking_preference(&user_id).map(Json)
}

pub async fn save_cooking_preference_handler(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
    Json(payload): Json<Preferences>,
) -> JsonResult<Preferences> {
    state.users.save_cooking_preference(&user_id, payload).map(Json)
}

pub async fn delete_cooking_preference_handler(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
) -> Result<StatusCode, RecipeError> {
    state.users.delete_cooking_preference(&user_id)?;
    Ok(StatusCode::NO_CONTENT)
}
