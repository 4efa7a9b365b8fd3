use serde::Serialize;
use tracing::warn;

use crate::llm_client::prompts::{fill_prompt, RECRUITING_EXPERT_SYSTEM};
use crate::llm_client::LlmClient;
use crate::recruiter::prompts::SUMMARY_PROMPT_TEMPLATE;

pub const NO_SUMMARY: &str = "No summary available.";

#[derive(Debug, Serialize)]
pub struct CandidateSummary {
    pub summary: String,
    pub available: bool,
}

/// Explains why the candidate fits the job. Never fails; an LLM error yields
/// the "No summary available." placeholder.
pub async fn summarize_candidate(
    llm: &LlmClient,
    resume_content: &str,
    job_description: &str,
) -> CandidateSummary {
    let prompt = fill_prompt(
        SUMMARY_PROMPT_TEMPLATE,
        &[
            ("resume_content", resume_content),
            ("job_description", job_description),
        ],
    );

    match llm.call_text(&prompt, RECRUITING_EXPERT_SYSTEM).await {
        Ok(summary) => CandidateSummary {
            summary,
            available: true,
        },
        Err(e) => {
            warn!("Candidate summary failed: {e}");
            CandidateSummary {
                summary: NO_SUMMARY.to_string(),
                available: false,
            }
        }
    }
}
