//! Store seams for the tailoring pipeline.
//!
//! The pipeline only sees these traits. `AppState` holds them as `Arc<dyn _>`, wired
//! at startup to `PgStore` or `InMemoryStore`; tests inject their own.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::{BoundedCache, CacheStats, EvictionPolicy};
use crate::errors::AppError;
use crate::models::bullet::EvidenceBulletRow;
use crate::models::document::{Citation, CitationRow, TailoredDocument, TailoredDocumentRow};
use crate::models::job::{JobRecord, JobRow};
use crate::models::profile::{CandidateIdentity, CandidateProfile, CandidateProfileRow};

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<JobRecord>, AppError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get_candidate_profile_with_bullets(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<CandidateProfile>, AppError>;
}

/// Append-only document storage. A save stores the document and all of its
/// citations, or nothing.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn save_tailored_document(&self, doc: &TailoredDocument) -> Result<(), AppError>;

    async fn get_document(&self, document_id: Uuid) -> Result<Option<TailoredDocument>, AppError>;

    /// Newest first.
    async fn list_documents_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<TailoredDocument>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Citations for every listed document in one query, keyed by document id.
    async fn load_citations(
        &self,
        document_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Citation>>, AppError> {
        if document_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, CitationRow>(
            r#"
            SELECT id, document_id, bullet_id, text, criterion, evidence_type, link
            FROM document_citations
            WHERE document_id = ANY($1)
            ORDER BY document_id, position ASC
            "#,
        )
        .bind(document_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(group_citations(rows))
    }
}

/// Groups citation rows by document. Rows must arrive in position order per document.
fn group_citations(rows: Vec<CitationRow>) -> HashMap<Uuid, Vec<Citation>> {
    let mut grouped: HashMap<Uuid, Vec<Citation>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.document_id)
            .or_default()
            .push(Citation::from(row));
    }
    grouped
}

#[async_trait]
impl JobRepository for PgStore {
    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<JobRecord>, AppError> {
        let row = sqlx::query_as::<_, JobRow>(
            "SELECT id, title, organization, must_have, preferred FROM jobs WHERE id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(JobRecord::from))
    }
}

#[async_trait]
impl ProfileRepository for PgStore {
    async fn get_candidate_profile_with_bullets(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<CandidateProfile>, AppError> {
        let Some(profile) = sqlx::query_as::<_, CandidateProfileRow>(
            "SELECT id, display_name, email FROM candidate_profiles WHERE id = $1",
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, EvidenceBulletRow>(
            r#"
            SELECT id, text, tags
            FROM evidence_bullets
            WHERE candidate_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;

        let bullets = rows
            .into_iter()
            .map(EvidenceBulletRow::into_bullet)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Malformed bullet tags: {e}")))?;

        Ok(Some(CandidateProfile {
            candidate_id: profile.id,
            identity: CandidateIdentity {
                display_name: profile.display_name,
                email: profile.email,
            },
            bullets,
        }))
    }
}

#[async_trait]
impl DocumentRepository for PgStore {
    async fn save_tailored_document(&self, doc: &TailoredDocument) -> Result<(), AppError> {
        let persistence = |e: sqlx::Error| AppError::Persistence(e.to_string());

        let mut tx = self.pool.begin().await.map_err(persistence)?;

        sqlx::query(
            r#"
            INSERT INTO tailored_documents
                (id, doc_type, content, job_id, candidate_id, version, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(doc.id)
        .bind(doc.doc_type.as_str())
        .bind(&doc.content)
        .bind(doc.metadata.job_id)
        .bind(doc.metadata.candidate_id)
        .bind(&doc.metadata.version)
        .bind(doc.metadata.created_at)
        .execute(&mut *tx)
        .await
        .map_err(persistence)?;

        for (position, citation) in doc.citations.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO document_citations
                    (id, document_id, bullet_id, text, criterion, evidence_type, link, position)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(citation.id)
            .bind(doc.id)
            .bind(citation.bullet_id)
            .bind(&citation.text)
            .bind(&citation.criterion)
            .bind(&citation.evidence_type)
            .bind(&citation.link)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(persistence)?;
        }

        tx.commit().await.map_err(persistence)?;

        info!(
            "Stored document {} ({}) with {} citations",
            doc.id,
            doc.doc_type,
            doc.citations.len()
        );
        Ok(())
    }

    async fn get_document(&self, document_id: Uuid) -> Result<Option<TailoredDocument>, AppError> {
        let Some(row) = sqlx::query_as::<_, TailoredDocumentRow>(
            "SELECT * FROM tailored_documents WHERE id = $1",
        )
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let citations = self
            .load_citations(&[row.id])
            .await?
            .remove(&row.id)
            .unwrap_or_default();
        Ok(Some(row.into_document(citations)?))
    }

    async fn list_documents_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<TailoredDocument>, AppError> {
        let rows = sqlx::query_as::<_, TailoredDocumentRow>(
            "SELECT * FROM tailored_documents WHERE candidate_id = $1 ORDER BY created_at DESC",
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut citations = self.load_citations(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let doc_citations = citations.remove(&row.id).unwrap_or_default();
                row.into_document(doc_citations)
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job cache decorator
// ────────────────────────────────────────────────────────────────────────────

/// Caches job lookups from any `JobRepository`. Only hits are cached; a missing job
/// is looked up again on the next request.
pub struct CachedJobRepository {
    inner: Arc<dyn JobRepository>,
    cache: Mutex<BoundedCache<Uuid, JobRecord>>,
}

impl CachedJobRepository {
    pub fn new(
        inner: Arc<dyn JobRepository>,
        capacity: usize,
        ttl: Duration,
        policy: EvictionPolicy,
    ) -> Self {
        Self {
            inner,
            cache: Mutex::new(BoundedCache::new(capacity, Some(ttl), policy)),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.cache
            .lock()
            .map(|c| c.stats())
            .unwrap_or_default()
    }

    pub fn entry_count(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or_default()
    }

    fn lock_err() -> AppError {
        AppError::Internal(anyhow::anyhow!("Job cache lock poisoned"))
    }
}

#[async_trait]
impl JobRepository for CachedJobRepository {
    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<JobRecord>, AppError> {
        // The guard must not live across the inner await
        let cached = {
            let mut cache = self.cache.lock().map_err(|_| Self::lock_err())?;
            cache.get(&job_id)
        };
        if let Some(job) = cached {
            debug!("Job cache hit for {job_id}");
            return Ok(Some(job));
        }

        let job = self.inner.get_job_by_id(job_id).await?;
        if let Some(job) = &job {
            let mut cache = self.cache.lock().map_err(|_| Self::lock_err())?;
            cache.insert(job_id, job.clone());
        }
        Ok(job)
    }
}
