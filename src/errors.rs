use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub type RecipeResult<T> = Result<T, RecipeError>;

#[derive(Debug, Error)]
pub enum RecipeError {
    // account has no resolvable ingredient/preference record
    #[error("There's no such user: {0}")]
    UserNotFound(String),

    #[error("no matching ingredients found for deletion")]
    IngredientNotFound,

    #[error("no cooking preference found")]
    PreferenceNotFound,

    #[error("missing caller identity")]
    Unauthenticated,

    #[error("recipe generator unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("recipe generator returned malformed output: {0}")]
    GenerationMalformed(String),

    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RecipeError {
    pub fn status(&self) -> StatusCode {
        match self {
            RecipeError::UserNotFound(_)
            | RecipeError::IngredientNotFound
            | RecipeError::PreferenceNotFound => StatusCode::NOT_FOUND,
            RecipeError::Unauthenticated => StatusCode::UNAUTHORIZED,
            RecipeError::GenerationUnavailable(_) | RecipeError::CacheUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            RecipeError::GenerationMalformed(_) => StatusCode::BAD_GATEWAY,
            RecipeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // dependency problems degrade to an empty result instead of failing the request
    pub fn is_fail_soft(&self) -> bool {
        matches!(
            self,
            RecipeError::GenerationUnavailable(_)
                | RecipeError::GenerationMalformed(_)
                | RecipeError::CacheUnavailable(_)
                | RecipeError::Internal(_)
        )
    }
}

impl From<redis::RedisError> for RecipeError {
    fn from(e: redis::RedisError) -> Self {
        RecipeError::CacheUnavailable(e.to_string())
    }
}

impl IntoResponse for RecipeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({
            "status": status.as_u16(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
