use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::analysis::scorer::score_or_zero;
use crate::models::resume::CandidateResumeRow;
use crate::storage::get_object;
use crate::uploads::extract::extract_pdf_text;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortlistedCandidate {
    pub resume_id: Uuid,
    pub name: String,
    pub resume_url: String,
    pub score: u32,
}

/// Scores every readable resume and keeps the top `count`, highest first.
/// Ties go to the earlier upload. Files that cannot be fetched or yield no
/// text are skipped.
pub async fn shortlist(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    resumes: &[CandidateResumeRow],
    job_description: &str,
    count: usize,
) -> Vec<ShortlistedCandidate> {
    let mut scored = Vec::with_capacity(resumes.len());

    for resume in in_upload_order(resumes) {
        let bytes = match get_object(s3, bucket, &resume.s3_key).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(resume_id = %resume.id, "Skipping resume, download failed: {e}");
                continue;
            }
        };
        let text = match extract_pdf_text(bytes).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) | Err(_) => {
                warn!(resume_id = %resume.id, "Skipping resume, no text extracted");
                continue;
            }
        };

        let score = score_or_zero(&text, job_description);
        debug!(resume_id = %resume.id, score, "Scored candidate");
        scored.push(ShortlistedCandidate {
            resume_id: resume.id,
            name: resume.applicant_name.clone(),
            resume_url: resume.download_url.clone(),
            score,
        });
    }

    rank_candidates(scored, count)
}

fn in_upload_order(resumes: &[CandidateResumeRow]) -> Vec<&CandidateResumeRow> {
    let mut ordered: Vec<_> = resumes.iter().collect();
    ordered.sort_by_key(|r| r.uploaded_at);
    ordered
}

/// Sorts by score descending (stable for ties) and truncates to `count`.
pub fn rank_candidates(
    mut candidates: Vec<ShortlistedCandidate>,
    count: usize,
) -> Vec<ShortlistedCandidate> {
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(count);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    fn candidate(name: &str, score: u32) -> ShortlistedCandidate {
        ShortlistedCandidate {
            resume_id: Uuid::new_v4(),
            name: name.to_string(),
            resume_url: format!("http://files/{name}.pdf"),
            score,
        }
    }

    #[test]
    fn test_rank_sorts_descending_and_truncates() {
        let ranked = rank_candidates(
            vec![candidate("a", 40), candidate("b", 90), candidate("c", 65)],
            2,
        );
        let names: Vec<_> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_rank_keeps_input_order_for_ties() {
        let ranked = rank_candidates(
            vec![candidate("first", 50), candidate("second", 50), candidate("third", 70)],
            3,
        );
        let names: Vec<_> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["third", "first", "second"]);
    }

    fn resume_row(name: &str, uploaded_at: DateTime<Utc>) -> CandidateResumeRow {
        CandidateResumeRow {
            id: Uuid::new_v4(),
            recruiter_id: Uuid::nil(),
            project_id: Uuid::nil(),
            applicant_name: name.to_string(),
            file_name: format!("{name}.pdf"),
            s3_key: format!("recruiter/x/y/{name}.pdf"),
            download_url: format!("http://files/{name}.pdf"),
            uploaded_at,
        }
    }

    #[test]
    fn test_ties_favour_the_earliest_upload() {
        let now = Utc::now();
        // Listing order is newest first.
        let rows = vec![
            resume_row("newest", now),
            resume_row("middle", now - Duration::minutes(5)),
            resume_row("oldest", now - Duration::minutes(10)),
        ];
        let scored = in_upload_order(&rows)
            .into_iter()
            .map(|r| candidate(&r.applicant_name, 60))
            .collect();
        let ranked = rank_candidates(scored, 2);
        let names: Vec<_> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["oldest", "middle"]);
    }

    #[test]
    fn test_count_larger_than_pool_returns_everyone() {
        let ranked = rank_candidates(vec![candidate("solo", 10)], 5);
        assert_eq!(ranked.len(), 1);
    }
}
