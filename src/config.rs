use clap::{Parser, ValueEnum};

// 24 hours
pub const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

// Digest used to build recipe cache keys
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyDigest {
    #[default]
    Sha256,
    // non-cryptographic, deterministic fallback
    Sip,
}

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "recipe-gateway")]
#[command(about = "Cache-aside recipe suggestions in front of a recipe generator")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Base url of the recipe generator, requests go to {url}/generate
    #[arg(short, long, default_value = "http://localhost:5001")]
    pub generator_url: String,

    // Generator request timeout in seconds
    #[arg(long, default_value_t = 180)]
    pub generator_timeout: u64,

    // Cache TTL in seconds
    #[arg(short, long, default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    // Redis url, in-memory cache is used when absent
    // Example: "redis://127.0.0.1:6379"
    #[arg(short, long)]
    pub redis_url: Option<String>,

    #[arg(long, value_enum, default_value_t = KeyDigest::Sha256)]
    pub key_digest: KeyDigest,
}
