//! Axum route handlers for the resume analysis API.

use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::analysis::keywords::extract_keywords;
use crate::analysis::models::{AnalysisResult, DetailedAnalysisResponse, RawAnalysisRequest};
use crate::analysis::pipeline::{run_analysis, run_detailed_analysis};
use crate::analysis::validate::validate_request;
use crate::errors::AppError;
use crate::extract::{extract_text, FileFormat};
use crate::state::AppState;

/// An uploaded resume file, request-scoped.
struct UploadedFile {
    filename: String,
    data: Bytes,
}

/// POST /resume/analyze
///
/// Full analysis from inline resume text. 400 on validation failure;
/// model failures degrade the response, they never fail it.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(raw): Json<RawAnalysisRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let request = validate_request(raw)?;
    info!("Starting resume analysis");
    let result = run_analysis(state.model.as_ref(), &request).await;
    Ok(Json(result))
}

/// POST /resume/analyze-file
///
/// Same analysis, but the resume arrives as a multipart file upload
/// (`resume_file`: pdf/docx/txt). 400 on bad file type or size, 422 when
/// the file cannot be parsed into text.
pub async fn handle_analyze_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let mut file: Option<UploadedFile> = None;
    let mut raw = RawAnalysisRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume_file") => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("unreadable file field: {e}")))?;
                file = Some(UploadedFile { filename, data });
            }
            Some("job_description") => raw.job_description = Some(read_text_field(field).await?),
            Some("target_role") => raw.target_role = Some(read_text_field(field).await?),
            Some("industry") => raw.industry = Some(read_text_field(field).await?),
            Some("experience_level") => {
                raw.experience_level = Some(read_text_field(field).await?)
            }
            _ => {} // unknown fields are ignored
        }
    }

    let file = file.ok_or_else(|| AppError::invalid("resume_file", "is required"))?;

    if file.data.len() > state.config.max_upload_bytes {
        return Err(AppError::FileTooLarge {
            size: file.data.len(),
            max: state.config.max_upload_bytes,
        });
    }

    let format = FileFormat::from_filename(&file.filename).ok_or_else(|| {
        let ext = file
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .unwrap_or_else(|| "(none)".to_string());
        AppError::UnsupportedFormat(ext)
    })?;

    info!(
        "Extracting text from uploaded {:?} file ({} bytes)",
        format,
        file.data.len()
    );
    raw.resume_text = Some(extract_text(&file.data, format)?);

    let request = validate_request(raw)?;
    let result = run_analysis(state.model.as_ref(), &request).await;
    Ok(Json(result))
}

/// POST /resume/detailed-analysis
///
/// Section-keyed breakdown: same orchestration as analyze, restructured
/// output with per-section rewrites and per-keyword occurrence detail.
pub async fn handle_detailed_analysis(
    State(state): State<AppState>,
    Json(raw): Json<RawAnalysisRequest>,
) -> Result<Json<DetailedAnalysisResponse>, AppError> {
    let request = validate_request(raw)?;
    info!("Starting detailed resume analysis");
    let response = run_detailed_analysis(state.model.as_ref(), &request).await;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct KeywordsQuery {
    #[serde(default)]
    pub job_description: Option<String>,
}

/// GET /resume/keywords?job_description=...
///
/// Keyword mapping only — the one endpoint where the mapping IS the
/// response, so a model failure with nothing salvageable is a 502 instead
/// of a silently empty 200.
pub async fn handle_keywords(
    State(state): State<AppState>,
    Query(query): Query<KeywordsQuery>,
) -> Result<Json<BTreeMap<String, f32>>, AppError> {
    let job_description = query
        .job_description
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if job_description.is_empty() {
        return Err(AppError::invalid("job_description", "is required"));
    }

    let extraction = extract_keywords(state.model.as_ref(), job_description).await;
    if extraction.degraded && extraction.keywords.is_empty() {
        return Err(AppError::ExternalService(
            "keyword extraction failed and no fallback matched".to_string(),
        ));
    }

    Ok(Json(extraction.keywords))
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("unreadable form field: {e}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Router tests with a deterministic model backend
// ────────────────────────────────────────────────────────────────────────────
