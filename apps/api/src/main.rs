mod cache;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod state;
mod tailor;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StoreBackend};
use crate::db::connect_store;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tailor::memory::{InMemoryStore, MemorySeed};
use crate::tailor::store::{
    CachedJobRepository, DocumentRepository, JobRepository, ProfileRepository,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ProofOfFit API v{}", env!("CARGO_PKG_VERSION"));

    let (jobs, profiles, documents) = build_repositories(&config).await?;

    // Wrap job lookups in the bounded cache unless disabled
    let job_cache = if config.job_cache_capacity > 0 {
        info!(
            "Job cache enabled: capacity={} ttl={:?} policy={}",
            config.job_cache_capacity,
            config.job_cache_ttl,
            config.job_cache_policy.as_str()
        );
        Some(Arc::new(CachedJobRepository::new(
            jobs.clone(),
            config.job_cache_capacity,
            config.job_cache_ttl,
            config.job_cache_policy,
        )))
    } else {
        info!("Job cache disabled");
        None
    };
    let jobs: Arc<dyn JobRepository> = match &job_cache {
        Some(cache) => cache.clone() as Arc<dyn JobRepository>,
        None => jobs,
    };

    let state = AppState {
        config: config.clone(),
        jobs,
        profiles,
        documents,
        job_cache,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

type Repositories = (
    Arc<dyn JobRepository>,
    Arc<dyn ProfileRepository>,
    Arc<dyn DocumentRepository>,
);

/// Wires every repository seam to the configured backend.
async fn build_repositories(config: &Config) -> Result<Repositories> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let store = Arc::new(connect_store(url).await?);
            Ok(share(store))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store: documents are lost on restart");
            let store = match &config.memory_seed_path {
                Some(path) => InMemoryStore::from_seed(MemorySeed::load(path).await?).await,
                None => {
                    warn!("MEMORY_SEED_PATH not set: no jobs or profiles are available");
                    InMemoryStore::new()
                }
            };
            Ok(share(Arc::new(store)))
        }
    }
}

fn share<S>(store: Arc<S>) -> Repositories
where
    S: JobRepository + ProfileRepository + DocumentRepository + 'static,
{
    let jobs: Arc<dyn JobRepository> = store.clone();
    let profiles: Arc<dyn ProfileRepository> = store.clone();
    let documents: Arc<dyn DocumentRepository> = store;
    (jobs, profiles, documents)
}
