pub mod analyses;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::config::{MAX_FILES_PER_BATCH, MAX_FILE_SIZE_BYTES};
use crate::state::AppState;

/// Whole-request body cap: a full batch of maximum-size files plus slack for
/// multipart framing. Axum's stock limit is 2 MB, well under one resume PDF;
/// without raising it the per-file size check would never be reached.
const MAX_BODY_BYTES: usize = MAX_FILE_SIZE_BYTES * MAX_FILES_PER_BATCH + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/analyses",
            post(analyses::handle_analyze_batch).get(analyses::handle_list_analyses),
        )
        .route("/api/v1/analyses/:id", get(analyses::handle_get_analysis))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
