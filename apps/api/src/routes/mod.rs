pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::tailor::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Documents API
        .route("/api/v1/documents/tailor", post(handlers::handle_tailor))
        .route("/api/v1/documents/preview", post(handlers::handle_preview))
        .route("/api/v1/documents/:id", get(handlers::handle_get_document))
        .route(
            "/api/v1/candidates/:id/documents",
            get(handlers::handle_list_candidate_documents),
        )
        .with_state(state)
}
