use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use crate::annotate::annotate;
use crate::cache::{RecipeCache, build_key};
use crate::config::KeyDigest;
use crate::errors::{RecipeError, RecipeResult};
use crate::generator::RecipeGenerator;
use crate::metrics::{CACHE_HITS, CACHE_MISSES, GENERATION_FAILURES};
use crate::models::{Recipe, ScoredRecipe};
use crate::users::UserDirectory;

// Cache-aside orchestration of recipe generation
pub struct RecipeService {
    users: Arc<dyn UserDirectory>,
    generator: Arc<dyn RecipeGenerator>,
    cache: RecipeCache,
    key_digest: KeyDigest,
}

impl RecipeService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        generator: Arc<dyn RecipeGenerator>,
        cache: RecipeCache,
        key_digest: KeyDigest,
    ) -> Self {
        Self {
            users,
            generator,
            cache,
            key_digest,
        }
    }

    // Recipes for the caller's current inventory, annotated with what they are missing.
    // Only UserNotFound is returned as an error; generator and cache failures,
    // and a panic anywhere in the pipeline, yield an empty list.
    pub async fn generate_recipes(self: &Arc<Self>, user_id: &str) -> RecipeResult<Vec<Recipe>> {
        let service = Arc::clone(self);
        let user = user_id.to_string();

        let outcome = tokio::spawn(async move { service.run(&user).await })
            .await
            .unwrap_or_else(|e| Err(RecipeError::Internal(e.to_string())));

        match outcome {
            Ok(recipes) => Ok(recipes),
            Err(e) if e.is_fail_soft() => {
                warn!(user_id, error = %e, "Recipe generation degraded to empty result");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn run(&self, user_id: &str) -> RecipeResult<Vec<Recipe>> {
        let start = Instant::now();

        let owned: Vec<String> = self
            .users
            .owned_ingredients(user_id)
            .await?
            .into_iter()
            .map(|ingredient| ingredient.name)
            .collect();

        let key = build_key(&owned, self.key_digest);

        if let Some(cached) = self.cache.lookup(&key).await {
            CACHE_HITS.inc();
            info!(
                key = %key,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Cache HIT"
            );
            return Ok(annotate(unwrap_scores(cached), &owned));
        }
        CACHE_MISSES.inc();
        info!(key = %key, "Cache MISS - calling generator");

        let preferences = self.users.preferences(user_id).await?;

        let scored = self
            .generator
            .generate(&owned, &preferences)
            .await
            .inspect_err(|e| {
                GENERATION_FAILURES.inc();
                error!(key = %key, error = %e, "Generation failed, nothing cached");
            })?;

        if scored.is_empty() {
            warn!(key = %key, "Generator returned no recipes, not caching");
        } else {
            self.cache.store(&key, &scored).await;
        }

        info!(
            key = %key,
            count = scored.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recipes generated"
        );
        Ok(annotate(unwrap_scores(scored), &owned))
    }
}

// score is not used for ranking yet
fn unwrap_scores(scored: Vec<ScoredRecipe>) -> Vec<Recipe> {
    scored.into_iter().map(|s| s.recipe).collect()
}
