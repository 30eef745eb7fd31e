//! Tailoring pipeline.
//!
//! Flow: parse document type → fetch job + profile (concurrently) → select bullets →
//!       render → build citations → persist → return document.
//!
//! Either the document and its citations are persisted and returned, or the caller
//! gets an error and nothing was stored. Nothing is retried here.

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::{
    DocumentMetadata, DocumentType, TailorPreferences, TailoredDocument, DOCUMENT_VERSION,
};
use crate::models::job::JobRecord;
use crate::models::profile::CandidateProfile;
use crate::tailor::citations::build_citations;
use crate::tailor::relevance::{select_relevant_bullets, ScoredBullet};
use crate::tailor::renderer::render_document;
use crate::tailor::store::{DocumentRepository, JobRepository, ProfileRepository};

/// Store collaborators for one pipeline run.
#[derive(Clone, Copy)]
pub struct TailorDeps<'a> {
    pub jobs: &'a dyn JobRepository,
    pub profiles: &'a dyn ProfileRepository,
    pub documents: &'a dyn DocumentRepository,
}

/// Request body for document tailoring. `document_type` stays a raw string so an
/// unknown value surfaces as `UnsupportedDocumentType` rather than a body parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct TailorRequest {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub document_type: String,
    #[serde(default)]
    pub preferences: Option<TailorPreferences>,
}

/// Runs the full pipeline and persists the resulting document.
pub async fn tailor_document(
    deps: TailorDeps<'_>,
    request: TailorRequest,
) -> Result<TailoredDocument, AppError> {
    // Step 1: Validate the type before touching any store
    let doc_type: DocumentType = request.document_type.parse()?;
    let preferences = request.preferences.unwrap_or_default();

    // Step 2: Fetch job and profile
    let (job, profile) = fetch_job_and_profile(deps, request.job_id, request.candidate_id).await?;

    // Step 3: Rank bullets
    if job.requirements.is_empty() {
        warn!("Job {} has no requirements; no bullets will be selected", job.id);
    }
    let ranked = select_relevant_bullets(&profile.bullets, &job.requirements);
    info!(
        "Selected {}/{} bullets for candidate {} against job {}",
        ranked.len(),
        profile.bullets.len(),
        profile.candidate_id,
        job.id
    );

    // Step 4: Render + cite from the same selection
    let content = render_document(doc_type, &job, &profile.identity, &ranked, &preferences);
    let citations = build_citations(&ranked);

    let doc = TailoredDocument {
        id: Uuid::new_v4(),
        doc_type,
        content,
        citations,
        metadata: DocumentMetadata {
            job_id: job.id,
            candidate_id: profile.candidate_id,
            created_at: Utc::now(),
            version: DOCUMENT_VERSION.to_string(),
        },
    };

    // Step 5: Persist
    deps.documents.save_tailored_document(&doc).await?;

    info!(
        "Generated {} {} with {} citations for candidate {}",
        doc.doc_type,
        doc.id,
        doc.citations.len(),
        doc.metadata.candidate_id
    );

    Ok(doc)
}

/// Ranks a candidate's bullets against a job without rendering or persisting.
pub async fn preview_selection(
    deps: TailorDeps<'_>,
    job_id: Uuid,
    candidate_id: Uuid,
) -> Result<Vec<ScoredBullet>, AppError> {
    let (job, profile) = fetch_job_and_profile(deps, job_id, candidate_id).await?;
    Ok(select_relevant_bullets(&profile.bullets, &job.requirements))
}

/// Both reads run concurrently. A missing job is reported ahead of a missing profile.
async fn fetch_job_and_profile(
    deps: TailorDeps<'_>,
    job_id: Uuid,
    candidate_id: Uuid,
) -> Result<(JobRecord, CandidateProfile), AppError> {
    let (job, profile) = tokio::try_join!(
        deps.jobs.get_job_by_id(job_id),
        deps.profiles.get_candidate_profile_with_bullets(candidate_id)
    )?;

    let job = job.ok_or(AppError::JobNotFound(job_id))?;
    let profile = profile.ok_or(AppError::ProfileNotFound(candidate_id))?;
    Ok((job, profile))
}
