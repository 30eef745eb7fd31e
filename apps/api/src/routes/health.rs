use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Reports service version, the configured store backend, and job cache counters.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    let job_cache = match &state.job_cache {
        Some(cache) => {
            let stats = cache.stats();
            json!({
                "capacity": config.job_cache_capacity,
                "ttl_secs": config.job_cache_ttl.as_secs(),
                "policy": config.job_cache_policy.as_str(),
                "entries": cache.entry_count(),
                "hits": stats.hits,
                "misses": stats.misses,
                "evictions": stats.evictions
            })
        }
        None => Value::Null,
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "proofoffit-api",
        "store_backend": config.store_backend.as_str(),
        "job_cache": job_cache
    }))
}
