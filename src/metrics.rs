use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("recipe_requests_total", "Total number of recipe requests").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("recipe_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("recipe_cache_misses_total", "Total cache misses").unwrap();
    pub static ref CACHE_ERRORS: Counter =
        register_counter!("recipe_cache_errors_total", "Cache reads or writes that failed").unwrap();
    pub static ref GENERATION_FAILURES: Counter = register_counter!(
        "recipe_generation_failures_total",
        "Generator calls that failed or returned malformed output"
    )
    .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "recipe_request_latency_seconds",
        "Recipe request latency in seconds"
    )
    .unwrap();
    pub static ref GENERATION_LATENCY: Histogram = register_histogram!(
        "recipe_generation_latency_seconds",
        "Generator call latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("recipe_cache_size", "Current number of entries in the in-memory cache").unwrap();
}
