use async_trait::async_trait;
use dashmap::DashMap;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use crate::config::KeyDigest;
use crate::errors::RecipeResult;
use crate::metrics::{CACHE_ERRORS, CACHE_SIZE};
use crate::models::ScoredRecipe;

pub const KEY_PREFIX: &str = "recipe:";
// Create a cache key from an unordered set of ingredient names.
// Names are trimmed, lowercased, deduplicated and sorted first.
// Each name is hashed behind its length so name boundaries stay unambiguous.
pub fn build_key<S: AsRef<str>>(ingredient_names: &[S], digest: KeyDigest) -> String {
    let canonical: Vec<String> = ingredient_names
        .iter()
        .map(|name| name.as_ref().trim().to_lowercase())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    match digest {
        KeyDigest::Sha256 => {
            let mut hasher = Sha256::new();
            for name in &canonical {
                hasher.update((name.len() as u64).to_le_bytes());
                hasher.update(name.as_bytes());
            }
            let hash = hasher.finalize();
            // 128 bits is plenty for a cache key
            let hex: String = hash[..16].iter().map(|b| format!("{:02x}", b)).collect();
            format!("{}{}", KEY_PREFIX, hex)
        }
        KeyDigest::Sip => {
            let mut hasher = DefaultHasher::new();
            canonical.hash(&mut hasher);
            format!("{}{:016x}", KEY_PREFIX, hasher.finish())
        }
    }
}

// Key/value channel with per-entry expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> RecipeResult<Option<String>>;
    async fn set(&self, key: &str, value: String, ttl: Duration) -> RecipeResult<()>;
}

// Cache entry with expiry timestamp
#[derive(Clone)]
pub struct CacheEntry {
    pub payload: String,
    pub expires_at: Instant,
}

// In-process store, expired entries are dropped when read
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.expires_at > Instant::now())
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> RecipeResult<Option<String>> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Ok(Some(entry.payload.clone()));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
            CACHE_SIZE.set(self.entries.len() as f64);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> RecipeResult<()> {
        let now = Instant::now();
        // sweep entries whose key is never read again
        self.entries.retain(|_, entry| entry.expires_at > now);
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                payload: value,
                expires_at: now + ttl,
            },
        );
        CACHE_SIZE.set(self.entries.len() as f64);
        Ok(())
    }
}

// Redis backed store, expiry handled by the server (SET .. EX)
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(redis_url: &str) -> RecipeResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;
        info!("Connected to redis at {}", redis_url);
        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> RecipeResult<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> RecipeResult<()> {
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1)).await?;
        Ok(())
    }
}

// Cache-aside wrapper: every failure is logged and swallowed
#[derive(Clone)]
pub struct RecipeCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl RecipeCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // Unreachable store, malformed or empty payload all read as a miss
    pub async fn lookup(&self, key: &str) -> Option<Vec<ScoredRecipe>> {
        let payload = match self.store.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                CACHE_ERRORS.inc();
                warn!(key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str::<Vec<ScoredRecipe>>(&payload) {
            Ok(recipes) if !recipes.is_empty() => Some(recipes),
            Ok(_) => {
                warn!(key, "Cached recipe list is empty, treating as miss");
                None
            }
            Err(e) => {
                CACHE_ERRORS.inc();
                warn!(key, error = %e, "Cached payload is malformed, treating as miss");
                None
            }
        }
    }

    pub async fn store(&self, key: &str, recipes: &[ScoredRecipe]) {
        let payload = match serde_json::to_string(recipes) {
            Ok(payload) => payload,
            Err(e) => {
                CACHE_ERRORS.inc();
                warn!(key, error = %e, "Could not serialize recipes for cache");
                return;
            }
        };

        match self.store.set(key, payload, self.ttl).await {
            Ok(()) => debug!(key, ttl_secs = self.ttl.as_secs(), "Recipes cached"),
            Err(e) => {
                CACHE_ERRORS.inc();
                warn!(key, error = %e, "Cache write failed");
            }
        }
    }
}
