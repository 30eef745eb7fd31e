use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::cache::EvictionPolicy;

/// Which storage backend the repositories are wired to at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Memory => "memory",
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Required only for the Postgres backend.
    pub database_url: Option<String>,
    /// JSON file of jobs and profiles loaded into the memory backend at startup.
    pub memory_seed_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
    /// 0 disables the job cache.
    pub job_cache_capacity: usize,
    pub job_cache_ttl: Duration,
    pub job_cache_policy: EvictionPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store_backend = parse_backend(&optional_env("STORE_BACKEND", "postgres"))?;
        let database_url = match store_backend {
            StoreBackend::Postgres => Some(require_env("DATABASE_URL")?),
            StoreBackend::Memory => std::env::var("DATABASE_URL").ok(),
        };

        Ok(Config {
            store_backend,
            database_url,
            memory_seed_path: std::env::var("MEMORY_SEED_PATH").ok().map(PathBuf::from),
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
            job_cache_capacity: optional_env("JOB_CACHE_CAPACITY", "256")
                .parse::<usize>()
                .context("JOB_CACHE_CAPACITY must be a non-negative integer")?,
            job_cache_ttl: Duration::from_secs(
                optional_env("JOB_CACHE_TTL_SECS", "300")
                    .parse::<u64>()
                    .context("JOB_CACHE_TTL_SECS must be a number of seconds")?,
            ),
            job_cache_policy: parse_policy(&optional_env("JOB_CACHE_POLICY", "lru"))?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_backend(raw: &str) -> Result<StoreBackend> {
    match raw.trim().to_lowercase().as_str() {
        "postgres" | "pg" => Ok(StoreBackend::Postgres),
        "memory" => Ok(StoreBackend::Memory),
        other => bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
    }
}

fn parse_policy(raw: &str) -> Result<EvictionPolicy> {
    match raw.trim().to_lowercase().as_str() {
        "lru" => Ok(EvictionPolicy::Lru),
        "fifo" => Ok(EvictionPolicy::Fifo),
        other => bail!("JOB_CACHE_POLICY must be 'lru' or 'fifo', got '{other}'"),
    }
}
