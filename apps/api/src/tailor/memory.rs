use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::TailoredDocument;
use crate::models::job::JobRecord;
use crate::models::profile::CandidateProfile;
use crate::tailor::store::{DocumentRepository, JobRepository, ProfileRepository};

/// Process-local store backing `STORE_BACKEND=memory` and the test suites.
#[derive(Default)]
pub struct InMemoryStore {
    jobs: RwLock<HashMap<Uuid, JobRecord>>,
    profiles: RwLock<HashMap<Uuid, CandidateProfile>>,
    documents: RwLock<Vec<TailoredDocument>>,
    fail_saves: AtomicBool,
    save_attempts: AtomicUsize,
}

/// Jobs and profiles preloaded into the memory backend (`MEMORY_SEED_PATH`).
#[derive(Debug, Default, Deserialize)]
pub struct MemorySeed {
    #[serde(default)]
    pub jobs: Vec<JobRecord>,
    #[serde(default)]
    pub profiles: Vec<CandidateProfile>,
}

impl MemorySeed {
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read memory seed file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Malformed memory seed file {}", path.display()))
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn from_seed(seed: MemorySeed) -> Self {
        let store = Self::new();
        let (job_count, profile_count) = (seed.jobs.len(), seed.profiles.len());
        for job in seed.jobs {
            store.insert_job(job).await;
        }
        for profile in seed.profiles {
            store.insert_profile(profile).await;
        }
        info!("Seeded in-memory store with {job_count} jobs and {profile_count} profiles");
        store
    }

    pub async fn insert_job(&self, job: JobRecord) {
        self.jobs.write().await.insert(job.id, job);
    }

    pub async fn insert_profile(&self, profile: CandidateProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.candidate_id, profile);
    }
}

#[cfg(test)]
impl InMemoryStore {
    /// When set, every save fails with a persistence error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of save calls, including failed ones.
    pub fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }

    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl JobRepository for InMemoryStore {
    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<JobRecord>, AppError> {
        Ok(self.jobs.read().await.get(&job_id).cloned())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn get_candidate_profile_with_bullets(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<CandidateProfile>, AppError> {
        Ok(self.profiles.read().await.get(&candidate_id).cloned())
    }
}

#[async_trait]
impl DocumentRepository for InMemoryStore {
    async fn save_tailored_document(&self, doc: &TailoredDocument) -> Result<(), AppError> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::Persistence(
                "in-memory store configured to reject writes".to_string(),
            ));
        }
        self.documents.write().await.push(doc.clone());
        Ok(())
    }

    async fn get_document(&self, document_id: Uuid) -> Result<Option<TailoredDocument>, AppError> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .find(|d| d.id == document_id)
            .cloned())
    }

    async fn list_documents_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<TailoredDocument>, AppError> {
        // Insertion order is creation order; reverse for newest first
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .rev()
            .filter(|d| d.metadata.candidate_id == candidate_id)
            .cloned()
            .collect())
    }
}
