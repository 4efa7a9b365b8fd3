use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::RecruiterUser;
use crate::errors::AppError;
use crate::models::project::ProjectRow;
use crate::models::resume::CandidateResumeRow;
use crate::recruiter::projects::{
    create_project, delete_project_row, get_owned_project, list_projects, update_project,
    validate_title,
};
use crate::recruiter::resumes::{delete_resume_row, get_resume, list_resumes, store_candidate_resume};
use crate::recruiter::shortlist::{shortlist, ShortlistedCandidate};
use crate::recruiter::summary::{summarize_candidate, CandidateSummary};
use crate::state::AppState;
use crate::storage::{delete_object, delete_prefix, get_object};
use crate::uploads::{
    extract::extract_pdf_text, project_prefix, read_multipart, validate_applicant_name,
    validate_pdf,
};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShortlistRequest {
    pub count: i64,
    /// Defaults to the project description.
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShortlistResponse {
    pub shortlisted: Vec<ShortlistedCandidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub job_description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Projects
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
) -> Result<Json<Vec<ProjectRow>>, AppError> {
    Ok(Json(list_projects(&state.db, user.id).await?))
}

/// POST /api/v1/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectRow>), AppError> {
    let title = validate_title(&req.title)?;
    let project = create_project(&state.db, user.id, &title, req.description.trim()).await?;
    info!(project_id = %project.id, recruiter_id = %user.id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectRow>, AppError> {
    Ok(Json(get_owned_project(&state.db, id, user.id).await?))
}

/// PATCH /api/v1/projects/:id
pub async fn handle_update_project(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectRow>, AppError> {
    if req.title.is_none() && req.description.is_none() {
        return Err(AppError::Validation(
            "Provide a title or description to update".to_string(),
        ));
    }
    let title = req.title.as_deref().map(validate_title).transpose()?;
    let description = req.description.as_deref().map(str::trim);

    let project = update_project(&state.db, id, user.id, title.as_deref(), description).await?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/:id
///
/// Removes the project's storage folder (best-effort), then the row.
pub async fn handle_delete_project(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let project = get_owned_project(&state.db, id, user.id).await?;

    let prefix = project_prefix(user.id, project.id);
    if let Err(e) = delete_prefix(&state.s3, &state.config.s3_bucket, &prefix).await {
        warn!(project_id = %project.id, "Project files not fully removed from {prefix}: {e}");
    }

    delete_project_row(&state.db, project.id, user.id).await?;
    info!(project_id = %project.id, recruiter_id = %user.id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate resumes
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/projects/:id/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CandidateResumeRow>>, AppError> {
    let project = get_owned_project(&state.db, id, user.id).await?;
    Ok(Json(list_resumes(&state.db, user.id, project.id).await?))
}

/// POST /api/v1/projects/:id/resumes
///
/// Multipart: `applicantName` and `file` (PDF).
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CandidateResumeRow>), AppError> {
    let project = get_owned_project(&state.db, id, user.id).await?;

    let mut form = read_multipart(&mut multipart, "file").await?;
    let applicant_name = validate_applicant_name(form.text("applicantName"))?;
    let file = form.take_file()?;
    validate_pdf(&file, state.config.max_upload_bytes)?;

    let row = store_candidate_resume(&state, user.id, project.id, &applicant_name, file).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /api/v1/projects/:id/resumes/:resume_id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path((id, resume_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let resume = get_resume(&state.db, user.id, id, resume_id).await?;
    delete_object(&state.s3, &state.config.s3_bucket, &resume.s3_key).await?;
    delete_resume_row(&state.db, resume.id).await?;
    info!(resume_id = %resume.id, project_id = %id, "Candidate resume deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/:id/shortlist
pub async fn handle_shortlist(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ShortlistRequest>,
) -> Result<Json<ShortlistResponse>, AppError> {
    let project = get_owned_project(&state.db, id, user.id).await?;
    let resumes = list_resumes(&state.db, user.id, project.id).await?;

    if req.count <= 0 || resumes.is_empty() {
        return Err(AppError::Validation(
            "Invalid input: No resumes or invalid count.".to_string(),
        ));
    }

    let job_description = job_description_for(&project, req.job_description.as_deref());
    let count = usize::try_from(req.count).unwrap_or(usize::MAX);
    let shortlisted = shortlist(
        &state.s3,
        &state.config.s3_bucket,
        &resumes,
        job_description,
        count,
    )
    .await;

    info!(
        project_id = %project.id,
        candidates = resumes.len(),
        shortlisted = shortlisted.len(),
        "Shortlist computed"
    );
    Ok(Json(ShortlistResponse { shortlisted }))
}

/// POST /api/v1/projects/:id/resumes/:resume_id/summary
pub async fn handle_candidate_summary(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path((id, resume_id)): Path<(Uuid, Uuid)>,
    body: Option<Json<SummaryRequest>>,
) -> Result<Json<CandidateSummary>, AppError> {
    let project = get_owned_project(&state.db, id, user.id).await?;
    let resume = get_resume(&state.db, user.id, project.id, resume_id).await?;
    let Json(req) = body.unwrap_or_default();

    let bytes = get_object(&state.s3, &state.config.s3_bucket, &resume.s3_key).await?;
    let resume_content = extract_pdf_text(bytes).await?;
    if resume_content.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Failed to extract content from resume".to_string(),
        ));
    }

    let job_description = job_description_for(&project, req.job_description.as_deref());
    Ok(Json(
        summarize_candidate(&state.llm, &resume_content, job_description).await,
    ))
}

/// Request override when non-blank, otherwise the project description.
fn job_description_for<'a>(project: &'a ProjectRow, requested: Option<&'a str>) -> &'a str {
    requested
        .map(str::trim)
        .filter(|jd| !jd.is_empty())
        .unwrap_or(project.description.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn project(description: &str) -> ProjectRow {
        ProjectRow {
            id: Uuid::new_v4(),
            recruiter_id: Uuid::new_v4(),
            title: "Backend".to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_job_description_prefers_request() {
        let p = project("Rust engineer");
        assert_eq!(job_description_for(&p, Some(" Go engineer ")), "Go engineer");
    }

    #[test]
    fn test_blank_request_falls_back_to_project() {
        let p = project("Rust engineer");
        assert_eq!(job_description_for(&p, Some("   ")), "Rust engineer");
        assert_eq!(job_description_for(&p, None), "Rust engineer");
    }

    #[test]
    fn test_shortlist_request_accepts_missing_job_description() {
        let req: ShortlistRequest = serde_json::from_str(r#"{"count": 3}"#).unwrap();
        assert_eq!(req.count, 3);
        assert!(req.job_description.is_none());
    }
}
