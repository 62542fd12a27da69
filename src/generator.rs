use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, error};
use crate::errors::{RecipeError, RecipeResult};
use crate::metrics::GENERATION_LATENCY;
use crate::models::{GenerationRequest, Preferences, ScoredRecipe};

// External recipe generator, a single request/response call per miss
#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    async fn generate(
        &self,
        user_ingredients: &[String],
        user_preferences: &Preferences,
    ) -> RecipeResult<Vec<ScoredRecipe>>;
}

// Generator reached over HTTP: POST {base}/generate
pub struct HttpGenerator {
    client: reqwest::Client,
    url: String,
}

impl HttpGenerator {
    pub fn new(base_url: &str, timeout: Duration) -> RecipeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RecipeError::Internal(format!("http client: {}", e)))?;

        // add http:// if not present
        let base = if base_url.starts_with("http") {
            base_url.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", base_url.trim_end_matches('/'))
        };

        Ok(Self {
            client,
            url: format!("{}/generate", base),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RecipeGenerator for HttpGenerator {
    async fn generate(
        &self,
        user_ingredients: &[String],
        user_preferences: &Preferences,
    ) -> RecipeResult<Vec<ScoredRecipe>> {
        let body = GenerationRequest {
            user_ingredients,
            user_preferences,
        };

        let start = Instant::now();
        let result = self.client.post(&self.url).json(&body).send().await;
        GENERATION_LATENCY.observe(start.elapsed().as_secs_f64());

        // timeouts surface here as transport errors
        let res = result.map_err(|e| {
            error!(url = %self.url, error = %e, timeout = e.is_timeout(), "Generator request failed");
            RecipeError::GenerationUnavailable(e.to_string())
        })?;

        let status = res.status();
        if !status.is_success() {
            error!(url = %self.url, %status, "Generator returned non-success status");
            return Err(RecipeError::GenerationUnavailable(format!("status {}", status)));
        }

        let text = res.text().await.map_err(|e| {
            error!(url = %self.url, error = %e, "Failed reading generator body");
            RecipeError::GenerationUnavailable(e.to_string())
        })?;

        parse_recipes(&text)
    }
}

// Parse the generator body into scored recipes
pub fn parse_recipes(body: &str) -> RecipeResult<Vec<ScoredRecipe>> {
    if body.trim().is_empty() {
        error!("Generator returned an empty body");
        return Err(RecipeError::GenerationMalformed("empty body".to_string()));
    }

    let recipes: Vec<ScoredRecipe> = serde_json::from_str(body).map_err(|e| {
        error!(error = %e, body_len = body.len(), "Generator body did not parse");
        RecipeError::GenerationMalformed(e.to_string())
    })?;

    debug!(count = recipes.len(), "Generator returned recipes");
    Ok(recipes)
}
