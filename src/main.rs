use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use recipe_gateway::cache::{CacheStore, MemoryCache, RecipeCache, RedisCache};
use recipe_gateway::config::Args;
use recipe_gateway::generator::HttpGenerator;
use recipe_gateway::service::RecipeService;
use recipe_gateway::state::AppState;
use recipe_gateway::users::MemoryUserStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // parse cli arguments
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("Recipe gateway failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn CacheStore> = match &args.redis_url {
        Some(url) => Arc::new(RedisCache::connect(url).await?),
        None => Arc::new(MemoryCache::new()),
    };
    let cache = RecipeCache::new(store, Duration::from_secs(args.cache_ttl));

    let generator = HttpGenerator::new(
        &args.generator_url,
        Duration::from_secs(args.generator_timeout),
    )?;
    let generator_url = generator.url().to_string();

    let users = Arc::new(MemoryUserStore::new());
    let recipes = Arc::new(RecipeService::new(
        users.clone(),
        Arc::new(generator),
        cache,
        args.key_digest,
    ));

    // creating shared state
    let state = Arc::new(AppState { recipes, users });
    let app = recipe_gateway::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Recipe gateway running on http://localhost:{}", args.port);
    info!("Forwarding cache misses to {}", generator_url);
    info!(
        "Cache: {} (TTL {} seconds, {:?} keys)",
        if args.redis_url.is_some() { "redis" } else { "in-memory" },
        args.cache_ttl,
        args.key_digest
    );
    axum::serve(listener, app).await?;
    Ok(())
}
