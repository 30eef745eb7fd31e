//! Axum route handlers for the Documents API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::TailoredDocument;
use crate::state::AppState;
use crate::tailor::engine::{preview_selection, tailor_document, TailorRequest};
use crate::tailor::relevance::ScoredBullet;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub selected: Vec<ScoredBullet>,
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<TailoredDocument>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/documents/tailor
///
/// Generates, persists, and returns a tailored resume, cover letter, or email.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<(StatusCode, Json<TailoredDocument>), AppError> {
    let doc = tailor_document(state.tailor_deps(), request).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// POST /api/v1/documents/preview
///
/// Shows which bullets would back a document for this job, without generating one.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let selected =
        preview_selection(state.tailor_deps(), request.job_id, request.candidate_id).await?;
    Ok(Json(PreviewResponse { selected }))
}

/// GET /api/v1/documents/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
) -> Result<Json<TailoredDocument>, AppError> {
    let doc = state
        .documents
        .get_document(document_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {document_id} not found")))?;
    Ok(Json(doc))
}

/// GET /api/v1/candidates/:id/documents
pub async fn handle_list_candidate_documents(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<DocumentListResponse>, AppError> {
    let documents = state
        .documents
        .list_documents_for_candidate(candidate_id)
        .await?;
    Ok(Json(DocumentListResponse { documents }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::cache::EvictionPolicy;
    use crate::config::{Config, StoreBackend};
    use crate::routes::build_router;
    use crate::state::AppState;
    use crate::tailor::fixtures::seeded_store;
    use crate::tailor::memory::InMemoryStore;
    use crate::tailor::store::CachedJobRepository;

    fn make_config() -> Config {
        Config {
            store_backend: StoreBackend::Memory,
            database_url: None,
            memory_seed_path: None,
            port: 0,
            rust_log: "info".to_string(),
            job_cache_capacity: 0,
            job_cache_ttl: Duration::from_secs(60),
            job_cache_policy: EvictionPolicy::Lru,
        }
    }

    fn make_router(store: Arc<InMemoryStore>) -> Router {
        build_router(AppState {
            config: make_config(),
            jobs: store.clone(),
            profiles: store.clone(),
            documents: store,
            job_cache: None,
        })
    }

    fn make_cached_router(store: Arc<InMemoryStore>) -> Router {
        let mut config = make_config();
        config.job_cache_capacity = 4;
        let cache = Arc::new(CachedJobRepository::new(
            store.clone(),
            config.job_cache_capacity,
            config.job_cache_ttl,
            config.job_cache_policy,
        ));
        build_router(AppState {
            config,
            jobs: cache.clone(),
            profiles: store.clone(),
            documents: store,
            job_cache: Some(cache),
        })
    }

    async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_tailor_endpoint_creates_document() {
        let (store, job_id, candidate_id) = seeded_store().await;
        let store = Arc::new(store);

        let (status, body) = send(
            make_router(store.clone()),
            "POST",
            "/api/v1/documents/tailor",
            Some(json!({
                "job_id": job_id,
                "candidate_id": candidate_id,
                "document_type": "cover_letter",
                "preferences": { "tone": "enthusiastic" }
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["type"], "cover_letter");
        assert_eq!(body["citations"].as_array().unwrap().len(), 2);
        assert!(body["content"].as_str().unwrap().contains("Dear Hiring Manager,"));
        assert_eq!(store.document_count().await, 1);
    }

    #[tokio::test]
    async fn test_tailor_endpoint_rejects_unknown_type() {
        let (store, job_id, candidate_id) = seeded_store().await;
        let store = Arc::new(store);

        let (status, body) = send(
            make_router(store.clone()),
            "POST",
            "/api/v1/documents/tailor",
            Some(json!({
                "job_id": job_id,
                "candidate_id": candidate_id,
                "document_type": "haiku"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_DOCUMENT_TYPE");
        assert_eq!(store.save_attempts(), 0);
    }

    #[tokio::test]
    async fn test_tailor_endpoint_missing_job_is_404() {
        let (store, _job_id, candidate_id) = seeded_store().await;

        let (status, body) = send(
            make_router(Arc::new(store)),
            "POST",
            "/api/v1/documents/tailor",
            Some(json!({
                "job_id": Uuid::new_v4(),
                "candidate_id": candidate_id,
                "document_type": "resume"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "JOB_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_and_list_documents() {
        let (store, job_id, candidate_id) = seeded_store().await;
        let store = Arc::new(store);

        let (_, created) = send(
            make_router(store.clone()),
            "POST",
            "/api/v1/documents/tailor",
            Some(json!({
                "job_id": job_id,
                "candidate_id": candidate_id,
                "document_type": "email"
            })),
        )
        .await;
        let doc_id = created["id"].as_str().unwrap().to_string();

        let (status, fetched) = send(
            make_router(store.clone()),
            "GET",
            &format!("/api/v1/documents/{doc_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["id"], created["id"]);

        let (status, listed) = send(
            make_router(store.clone()),
            "GET",
            &format!("/api/v1/candidates/{candidate_id}/documents"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed["documents"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_document_is_404() {
        let (status, body) = send(
            make_router(Arc::new(InMemoryStore::new())),
            "GET",
            &format!("/api/v1/documents/{}", Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_preview_returns_ranked_bullets() {
        let (store, job_id, candidate_id) = seeded_store().await;
        let store = Arc::new(store);

        let (status, body) = send(
            make_router(store.clone()),
            "POST",
            "/api/v1/documents/preview",
            Some(json!({ "job_id": job_id, "candidate_id": candidate_id })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let selected = body["selected"].as_array().unwrap();
        assert_eq!(selected.len(), 2);
        assert!(selected[0]["relevance_score"].as_u64().unwrap() > 0);
        assert_eq!(store.document_count().await, 0);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(
            make_router(Arc::new(InMemoryStore::new())),
            "GET",
            "/health",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store_backend"], "memory");
        assert!(body["job_cache"].is_null());
    }

    #[tokio::test]
    async fn test_health_reports_job_cache_counters() {
        let (store, job_id, candidate_id) = seeded_store().await;
        let router = make_cached_router(Arc::new(store));

        for _ in 0..2 {
            let (status, _) = send(
                router.clone(),
                "POST",
                "/api/v1/documents/preview",
                Some(json!({ "job_id": job_id, "candidate_id": candidate_id })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, body) = send(router, "GET", "/health", None).await;
        let cache = &body["job_cache"];
        assert_eq!(cache["capacity"], 4);
        assert_eq!(cache["policy"], "lru");
        assert_eq!(cache["entries"], 1);
        assert_eq!(cache["misses"], 1);
        assert_eq!(cache["hits"], 1);
    }
}
