use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use crate::errors::RecipeError;

pub const USER_ID_HEADER: &str = "x-user-id";

// Caller identity, resolved by the session layer in front of this service
pub struct CallerId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for CallerId {
    type Rejection = RecipeError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| CallerId(id.to_string()))
            .ok_or(RecipeError::Unauthenticated)
    }
}
