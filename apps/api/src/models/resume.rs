use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata for one uploaded candidate file. The file itself lives in S3 at `s3_key`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateResumeRow {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub project_id: Uuid,
    pub applicant_name: String,
    pub file_name: String,
    #[serde(skip_serializing)]
    pub s3_key: String,
    pub download_url: String,
    pub uploaded_at: DateTime<Utc>,
}
