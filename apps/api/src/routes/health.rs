use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
/// Never touches the model backend — stays green when the provider is down.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-tailor-api"
    }))
}

/// GET /
/// Small index of the available endpoints.
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "message": "Resume Tailor API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "resume_analysis": "/resume/analyze",
            "file_analysis": "/resume/analyze-file",
            "detailed_analysis": "/resume/detailed-analysis",
            "keywords": "/resume/keywords"
        }
    }))
}
