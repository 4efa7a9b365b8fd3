//! Axum route handlers for the resume analysis API.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::parser::{parse_analysis_text, AnalysisResult};
use crate::analysis::pdf::{render_report, REPORT_FILE_NAME};
use crate::analysis::prompts::CRITIQUE_PROMPT_TEMPLATE;
use crate::analysis::report::build_analysis_text;
use crate::analysis::scorer::{score_resume, ResumeScore, DEFAULT_JOB_DESCRIPTION};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_prompt, RECRUITING_EXPERT_SYSTEM};
use crate::state::AppState;
use crate::uploads::{extract::extract_pdf_text, read_multipart, validate_pdf};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Headed analysis text, as a client would display it.
    pub analysis: String,
    pub result: AnalysisResult,
    /// Absent when the document was rejected as a non-resume.
    pub score: Option<ResumeScore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Ai,
    Deterministic,
}

#[derive(Debug, Serialize)]
pub struct CritiqueResponse {
    pub analysis: String,
    pub result: AnalysisResult,
    pub source: AnalysisSource,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/extract-text
pub async fn handle_extract_text(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractTextResponse>, AppError> {
    let mut form = read_multipart(&mut multipart, "file").await?;
    let file = form.take_file()?;
    validate_pdf(&file, state.config.max_upload_bytes)?;

    let text = extract_pdf_text(file.bytes).await?;
    info!("Extracted {} characters from {}", text.len(), file.file_name);
    Ok(Json(ExtractTextResponse { text }))
}

/// POST /api/v1/resume/analyze
///
/// Deterministic ATS analysis. No LLM call.
pub async fn handle_analyze(
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    require_resume_text(&req.resume_text)?;

    let outcome = score_resume(&req.resume_text, req.job_description.as_deref().unwrap_or(""));
    let analysis = build_analysis_text(&outcome);
    let result = parse_analysis_text(&analysis);

    Ok(Json(AnalyzeResponse {
        analysis,
        result,
        score: outcome.ok(),
    }))
}

/// POST /api/v1/resume/critique
///
/// Asks the LLM for a headed critique; falls back to the deterministic
/// analysis when the call fails.
pub async fn handle_critique(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<CritiqueResponse>, AppError> {
    require_resume_text(&req.resume_text)?;

    let job_description = req
        .job_description
        .as_deref()
        .filter(|jd| !jd.trim().is_empty())
        .unwrap_or(DEFAULT_JOB_DESCRIPTION);

    let prompt = fill_prompt(
        CRITIQUE_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("resume_text", &req.resume_text),
        ],
    );

    let (analysis, source) = match state.llm.call_text(&prompt, RECRUITING_EXPERT_SYSTEM).await {
        Ok(text) => (text, AnalysisSource::Ai),
        Err(e) => {
            warn!("Critique LLM call failed, using deterministic analysis: {e}");
            let outcome = score_resume(&req.resume_text, job_description);
            (build_analysis_text(&outcome), AnalysisSource::Deterministic)
        }
    };

    let result = parse_analysis_text(&analysis);
    Ok(Json(CritiqueResponse {
        analysis,
        result,
        source,
    }))
}

/// POST /api/v1/resume/report
///
/// Renders an `AnalysisResult` as a downloadable PDF.
pub async fn handle_report(Json(result): Json<AnalysisResult>) -> Result<Response, AppError> {
    let bytes = render_report(&result)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Report rendering failed: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILE_NAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

fn require_resume_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    Ok(())
}
