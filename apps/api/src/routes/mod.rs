pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

/// Headroom above the configured file cap so multipart framing and the
/// accompanying form fields do not trip the body limit before the
/// per-file size check runs.
const BODY_LIMIT_HEADROOM: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + BODY_LIMIT_HEADROOM;

    Router::new()
        .route("/", get(health::index_handler))
        .route("/health", get(health::health_handler))
        .route("/resume/analyze", post(handlers::handle_analyze))
        .route("/resume/analyze-file", post(handlers::handle_analyze_file))
        .route(
            "/resume/detailed-analysis",
            post(handlers::handle_detailed_analysis),
        )
        .route("/resume/keywords", get(handlers::handle_keywords))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
