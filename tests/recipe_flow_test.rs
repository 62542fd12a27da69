use async_trait::async_trait;
use axum::{Json, Router, http::StatusCode, routing::post};
use recipe_gateway::cache::{CacheStore, MemoryCache, RecipeCache, build_key};
use recipe_gateway::config::KeyDigest;
use recipe_gateway::errors::{RecipeError, RecipeResult};
use recipe_gateway::generator::{HttpGenerator, RecipeGenerator};
use recipe_gateway::models::{Ingredient, Preferences, ScoredRecipe};
use recipe_gateway::service::RecipeService;
use recipe_gateway::state::AppState;
use recipe_gateway::users::MemoryUserStore;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// Deterministic generator that counts its calls
struct FakeGenerator {
    calls: AtomicUsize,
    reply: Mutex<RecipeResult<Vec<ScoredRecipe>>>,
    seen_preferences: Mutex<Option<Preferences>>,
}

impl FakeGenerator {
    fn replying(reply: RecipeResult<Vec<ScoredRecipe>>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply: Mutex::new(reply),
            seen_preferences: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeGenerator for FakeGenerator {
    async fn generate(
        &self,
        _user_ingredients: &[String],
        user_preferences: &Preferences,
    ) -> RecipeResult<Vec<ScoredRecipe>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen_preferences.lock().unwrap() = Some(user_preferences.clone());
        match &*self.reply.lock().unwrap() {
            Ok(recipes) => Ok(recipes.clone()),
            Err(RecipeError::GenerationMalformed(m)) => Err(RecipeError::GenerationMalformed(m.clone())),
            Err(e) => Err(RecipeError::GenerationUnavailable(e.to_string())),
        }
    }
}

struct PanickingGenerator;

#[async_trait]
impl RecipeGenerator for PanickingGenerator {
    async fn generate(&self, _: &[String], _: &Preferences) -> RecipeResult<Vec<ScoredRecipe>> {
        panic!("generator blew up");
    }
}

fn scored_recipe(name: &str, ingredients: &[&str]) -> ScoredRecipe {
    let ingredients: Vec<Value> = ingredients.iter().map(|n| json!({ "name": n })).collect();
    serde_json::from_value(json!({
        "recipe": { "name": name, "ingredients": ingredients, "steps": ["cook"] },
        "score": 8.0,
    }))
    .unwrap()
}

fn owned(names: &[&str]) -> Vec<Ingredient> {
    names
        .iter()
        .map(|n| Ingredient {
            name: n.to_string(),
            category: "pantry".to_string(),
        })
        .collect()
}

struct Harness {
    service: Arc<RecipeService>,
    users: Arc<MemoryUserStore>,
    store: Arc<MemoryCache>,
}

fn harness(generator: Arc<dyn RecipeGenerator>) -> Harness {
    harness_with_ttl(generator, Duration::from_secs(60))
}

fn harness_with_ttl(generator: Arc<dyn RecipeGenerator>, ttl: Duration) -> Harness {
    let users = Arc::new(MemoryUserStore::new());
    let store = Arc::new(MemoryCache::new());
    let cache = RecipeCache::new(store.clone(), ttl);
    let service = Arc::new(RecipeService::new(
        users.clone(),
        generator,
        cache,
        KeyDigest::Sha256,
    ));
    Harness {
        service,
        users,
        store,
    }
}

fn user_with(h: &Harness, user_id: &str, ingredients: &[&str]) {
    h.users.register(user_id);
    h.users.add_ingredients(user_id, owned(ingredients)).unwrap();
}

#[tokio::test]
async fn miss_generates_annotates_and_caches() {
    let generator = FakeGenerator::replying(Ok(vec![scored_recipe(
        "Cake",
        &["eggs", "flour", "sugar"],
    )]));
    let h = harness(generator.clone());
    user_with(&h, "amy", &["eggs", "flour"]);

    let recipes = h.service.generate_recipes("amy").await.unwrap();

    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].missing_ingredients, vec!["sugar"]);
    assert_eq!(generator.calls(), 1);
    assert!(h.store.contains(&build_key(&["eggs", "flour"], KeyDigest::Sha256)));
}

#[tokio::test]
async fn second_call_is_served_from_cache() {
    let generator = FakeGenerator::replying(Ok(vec![scored_recipe("Cake", &["eggs", "flour"])]));
    let h = harness(generator.clone());
    user_with(&h, "amy", &["flour", "eggs"]);

    let first = h.service.generate_recipes("amy").await.unwrap();
    let second = h.service.generate_recipes("amy").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn expired_entry_calls_generator_again() {
    let generator = FakeGenerator::replying(Ok(vec![scored_recipe("Cake", &["eggs", "flour"])]));
    let h = harness_with_ttl(generator.clone(), Duration::from_millis(20));
    user_with(&h, "amy", &["eggs", "flour"]);

    h.service.generate_recipes("amy").await.unwrap();
    assert_eq!(generator.calls(), 1);

    tokio::time::sleep(Duration::from_millis(50)).await;

    let recipes = h.service.generate_recipes("amy").await.unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn cache_hit_annotates_for_the_current_caller() {
    let generator = FakeGenerator::replying(Ok(vec![scored_recipe(
        "Pancakes",
        &["eggs", "flour", "milk"],
    )]));
    let h = harness(generator.clone());
    user_with(&h, "amy", &["eggs", "flour", "milk"]);
    // same set with different casing and order shares the cache entry
    user_with(&h, "bob", &["MILK", "Eggs", "flour"]);

    let amy = h.service.generate_recipes("amy").await.unwrap();
    assert!(amy[0].missing_ingredients.is_empty());

    let bob = h.service.generate_recipes("bob").await.unwrap();
    assert!(bob[0].missing_ingredients.is_empty());
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn missing_ingredients_are_case_insensitive_and_ordered() {
    let generator = FakeGenerator::replying(Ok(vec![scored_recipe(
        "Crepes",
        &["eggs", "flour", "milk"],
    )]));
    let h = harness(generator);
    user_with(&h, "amy", &["Eggs", "Butter"]);

    let recipes = h.service.generate_recipes("amy").await.unwrap();
    assert_eq!(recipes[0].missing_ingredients, vec!["flour", "milk"]);
}

#[tokio::test]
async fn empty_generation_is_not_cached() {
    let generator = FakeGenerator::replying(Ok(Vec::new()));
    let h = harness(generator.clone());
    user_with(&h, "amy", &["eggs"]);

    assert!(h.service.generate_recipes("amy").await.unwrap().is_empty());
    assert!(h.service.generate_recipes("amy").await.unwrap().is_empty());

    assert_eq!(generator.calls(), 2);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn generator_failure_degrades_to_empty() {
    for reply in [
        Err(RecipeError::GenerationUnavailable("status 500".into())),
        Err(RecipeError::GenerationMalformed("empty body".into())),
    ] {
        let generator = FakeGenerator::replying(reply);
        let h = harness(generator.clone());
        user_with(&h, "amy", &["eggs"]);

        let recipes = h.service.generate_recipes("amy").await.unwrap();
        assert!(recipes.is_empty());
        assert!(h.store.is_empty());

        h.service.generate_recipes("amy").await.unwrap();
        assert_eq!(generator.calls(), 2);
    }
}

#[tokio::test]
async fn panic_in_pipeline_degrades_to_empty() {
    let h = harness(Arc::new(PanickingGenerator));
    user_with(&h, "amy", &["eggs"]);

    let recipes = h.service.generate_recipes("amy").await.unwrap();
    assert!(recipes.is_empty());
}

#[tokio::test]
async fn unknown_user_is_propagated() {
    let generator = FakeGenerator::replying(Ok(vec![scored_recipe("Cake", &["eggs"])]));
    let h = harness(generator.clone());

    let err = h.service.generate_recipes("ghost").await.unwrap_err();
    assert!(matches!(err, RecipeError::UserNotFound(_)));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn corrupt_cache_entry_falls_through_to_generator() {
    let generator = FakeGenerator::replying(Ok(vec![scored_recipe("Cake", &["eggs"])]));
    let h = harness(generator.clone());
    user_with(&h, "amy", &["eggs"]);

    let key = build_key(&["eggs"], KeyDigest::Sha256);
    h.store
        .set(&key, "definitely not json".into(), Duration::from_secs(60))
        .await
        .unwrap();

    let recipes = h.service.generate_recipes("amy").await.unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(generator.calls(), 1);

    // the fresh result replaced the corrupt entry
    h.service.generate_recipes("amy").await.unwrap();
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn saved_preferences_reach_the_generator() {
    let generator = FakeGenerator::replying(Ok(vec![scored_recipe("Soup", &["leek"])]));
    let h = harness(generator.clone());
    user_with(&h, "amy", &["leek"]);
    let prefs: Preferences =
        serde_json::from_value(json!({ "cookingMethods": ["boil"], "vegan": "strict" })).unwrap();
    h.users.save_cooking_preference("amy", prefs.clone()).unwrap();

    h.service.generate_recipes("amy").await.unwrap();
    assert_eq!(*generator.seen_preferences.lock().unwrap(), Some(prefs));
}

// HTTP generator against a loopback server

async fn spawn_generator(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn http_generator(app: Router, timeout: Duration) -> HttpGenerator {
    let url = spawn_generator(app).await;
    HttpGenerator::new(&url, timeout).unwrap()
}

#[tokio::test]
async fn http_generator_posts_ingredients_and_preferences() {
    let app = Router::new().route(
        "/generate",
        post(|Json(body): Json<Value>| async move {
            let first = body["userIngredients"][0].as_str().unwrap_or_default().to_string();
            let methods = body["userPreferences"]["cookingMethods"].clone();
            Json(json!([{
                "recipe": { "name": first, "ingredients": [{"name": "salt"}], "steps": [methods.to_string()] },
                "score": 7.5
            }]))
        }),
    );
    let generator = http_generator(app, Duration::from_secs(5)).await;
    let prefs = Preferences {
        cooking_methods: vec!["bake".into()],
        ..Default::default()
    };

    let recipes = generator.generate(&["eggs".to_string()], &prefs).await.unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].recipe.name, "eggs");
    assert_eq!(recipes[0].recipe.steps, vec![r#"["bake"]"#]);
    assert_eq!(recipes[0].score, 7.5);
}

#[tokio::test]
async fn http_generator_status_500_is_unavailable() {
    let app = Router::new().route(
        "/generate",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"}))) }),
    );
    let generator = http_generator(app, Duration::from_secs(5)).await;

    let err = generator.generate(&[], &Preferences::default()).await.unwrap_err();
    assert!(matches!(err, RecipeError::GenerationUnavailable(_)));
}

#[tokio::test]
async fn http_generator_bad_bodies_are_malformed() {
    for body in ["", "not json at all", r#"{"recipe": 1}"#] {
        let app = Router::new().route("/generate", post(move || async move { body }));
        let generator = http_generator(app, Duration::from_secs(5)).await;

        let err = generator.generate(&[], &Preferences::default()).await.unwrap_err();
        assert!(matches!(err, RecipeError::GenerationMalformed(_)), "body {:?}", body);
    }
}

#[tokio::test]
async fn http_generator_timeout_is_unavailable() {
    let app = Router::new().route(
        "/generate",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "[]"
        }),
    );
    let generator = http_generator(app, Duration::from_millis(100)).await;

    let err = generator.generate(&[], &Preferences::default()).await.unwrap_err();
    assert!(matches!(err, RecipeError::GenerationUnavailable(_)));
}

#[tokio::test]
async fn failing_http_generator_leaves_cache_empty() {
    let app = Router::new().route("/generate", post(|| async { StatusCode::BAD_GATEWAY }));
    let generator = http_generator(app, Duration::from_secs(5)).await;
    let h = harness(Arc::new(generator));
    user_with(&h, "amy", &["eggs", "flour"]);

    assert!(h.service.generate_recipes("amy").await.unwrap().is_empty());
    assert!(!h.store.contains(&build_key(&["eggs", "flour"], KeyDigest::Sha256)));
}

// full gateway over HTTP

#[tokio::test]
async fn gateway_routes_end_to_end() {
    let generator = FakeGenerator::replying(Ok(vec![scored_recipe(
        "Cake",
        &["eggs", "flour", "sugar"],
    )]));
    let h = harness(generator.clone());
    let state = Arc::new(AppState {
        recipes: h.service.clone(),
        users: h.users.clone(),
    });
    let base = spawn_generator(recipe_gateway::router(state)).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/users", base))
        .json(&json!({ "userId": "amy" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);

    let res = client
        .post(format!("{}/user/ingredients/create", base))
        .header("x-user-id", "amy")
        .json(&json!([{ "name": "eggs", "category": "dairy" }, { "name": "flour", "category": "grain" }]))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());

    let res = client
        .post(format!("{}/recipes/generate", base))
        .header("x-user-id", "amy")
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    let recipes: Vec<Value> = res.json().await.unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["missingIngredients"], json!(["sugar"]));

    let res = client
        .post(format!("{}/recipes/generate", base))
        .header("x-user-id", "ghost")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    let res = client
        .post(format!("{}/recipes/generate", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::UNAUTHORIZED);
}
