use std::sync::Arc;

use crate::config::Config;
use crate::tailor::engine::TailorDeps;
use crate::tailor::store::{
    CachedJobRepository, DocumentRepository, JobRepository, ProfileRepository,
};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Possibly wrapped in `CachedJobRepository`, depending on JOB_CACHE_CAPACITY.
    pub jobs: Arc<dyn JobRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    /// Same instance as `jobs` when the cache is enabled; kept for its counters.
    pub job_cache: Option<Arc<CachedJobRepository>>,
}

impl AppState {
    pub fn tailor_deps(&self) -> TailorDeps<'_> {
        TailorDeps {
            jobs: self.jobs.as_ref(),
            profiles: self.profiles.as_ref(),
            documents: self.documents.as_ref(),
        }
    }
}
