use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::CandidateResumeRow;
use crate::state::AppState;
use crate::storage::{download_url, put_pdf};
use crate::uploads::{storage_key, UploadedFile};

pub async fn list_resumes(
    pool: &PgPool,
    recruiter_id: Uuid,
    project_id: Uuid,
) -> Result<Vec<CandidateResumeRow>, AppError> {
    let rows = sqlx::query_as::<_, CandidateResumeRow>(
        r#"
        SELECT * FROM resumes
        WHERE recruiter_id = $1 AND project_id = $2
        ORDER BY uploaded_at DESC
        "#,
    )
    .bind(recruiter_id)
    .bind(project_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_resume(
    pool: &PgPool,
    recruiter_id: Uuid,
    project_id: Uuid,
    resume_id: Uuid,
) -> Result<CandidateResumeRow, AppError> {
    sqlx::query_as::<_, CandidateResumeRow>(
        "SELECT * FROM resumes WHERE id = $1 AND recruiter_id = $2 AND project_id = $3",
    )
    .bind(resume_id)
    .bind(recruiter_id)
    .bind(project_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
}

pub async fn delete_resume_row(pool: &PgPool, resume_id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM resumes WHERE id = $1")
        .bind(resume_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Uploads the file, then records its metadata. The two steps are not atomic:
/// when the insert fails the object stays behind and its key is logged.
pub async fn store_candidate_resume(
    state: &AppState,
    recruiter_id: Uuid,
    project_id: Uuid,
    applicant_name: &str,
    file: UploadedFile,
) -> Result<CandidateResumeRow, AppError> {
    let resume_id = Uuid::new_v4();
    let key = storage_key(
        recruiter_id,
        project_id,
        applicant_name,
        Utc::now().timestamp_millis(),
        resume_id,
    );
    let url = download_url(&state.config.public_base_url, &state.config.s3_bucket, &key)?;
    put_pdf(&state.s3, &state.config.s3_bucket, &key, file.bytes).await?;

    let inserted = sqlx::query_as::<_, CandidateResumeRow>(
        r#"
        INSERT INTO resumes
            (id, recruiter_id, project_id, applicant_name, file_name, s3_key, download_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(resume_id)
    .bind(recruiter_id)
    .bind(project_id)
    .bind(applicant_name)
    .bind(&file.file_name)
    .bind(&key)
    .bind(&url)
    .fetch_one(&state.db)
    .await;

    match inserted {
        Ok(row) => {
            info!(resume_id = %row.id, project_id = %project_id, "Candidate resume stored");
            Ok(row)
        }
        Err(e) => {
            error!(s3_key = %key, "Resume metadata insert failed, object left orphaned: {e}");
            Err(e.into())
        }
    }
}
