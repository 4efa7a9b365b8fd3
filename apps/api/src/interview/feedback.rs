use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interview::prompts::FEEDBACK_PROMPT_TEMPLATE;
use crate::interview::session::InterviewOutcome;
use crate::llm_client::prompts::{fill_prompt, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};

pub const FALLBACK_SUMMARY: &str = "Candidate demonstrated strong communication skills and good \
    technical knowledge of React. Needs improvement in system design concepts.";
pub const FALLBACK_FEEDBACK: &str = "Good use of STAR method for behavioral questions. \
    Technical answers were accurate but could be more detailed.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewFeedback {
    pub summary: String,
    pub feedback: String,
}

/// Generates summary and feedback, degrading to the fixed pair on any failure.
pub async fn feedback_or_fallback(
    llm: &LlmClient,
    user_name: &str,
    answers: &[(String, String)],
) -> InterviewOutcome {
    match generate_feedback(llm, user_name, answers).await {
        Ok(f) if !f.summary.trim().is_empty() && !f.feedback.trim().is_empty() => {
            InterviewOutcome {
                summary: f.summary,
                feedback: f.feedback,
                demo_mode: false,
            }
        }
        Ok(_) => {
            warn!("Feedback generation returned blank fields, using fallback");
            fallback_outcome()
        }
        Err(e) => {
            warn!("Feedback generation failed, using fallback: {e}");
            fallback_outcome()
        }
    }
}

fn fallback_outcome() -> InterviewOutcome {
    InterviewOutcome {
        summary: FALLBACK_SUMMARY.to_string(),
        feedback: FALLBACK_FEEDBACK.to_string(),
        demo_mode: true,
    }
}

async fn generate_feedback(
    llm: &LlmClient,
    user_name: &str,
    answers: &[(String, String)],
) -> Result<InterviewFeedback, LlmError> {
    let answers = format_answers(answers);
    let prompt = fill_prompt(
        FEEDBACK_PROMPT_TEMPLATE,
        &[("user_name", user_name), ("answers", &answers)],
    );
    llm.call_json(&prompt, JSON_ONLY_SYSTEM).await
}

/// One `question: answer` line per answered question.
fn format_answers(answers: &[(String, String)]) -> String {
    answers
        .iter()
        .map(|(q, a)| format!("{q}: {a}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_answers_one_line_each() {
        let answers = vec![
            ("Q1?".to_string(), "A1".to_string()),
            ("Q2?".to_string(), "A2".to_string()),
        ];
        assert_eq!(format_answers(&answers), "Q1?: A1\nQ2?: A2");
    }

    #[test]
    fn test_fallback_outcome_is_demo_mode() {
        let outcome = fallback_outcome();
        assert!(outcome.demo_mode);
        assert!(outcome.summary.starts_with("Candidate demonstrated strong communication skills"));
        assert!(outcome.feedback.ends_with("could be more detailed."));
    }
}
