use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interview::prompts::QUESTIONS_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{fill_prompt, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};

pub const DEFAULT_JOB_ROLE: &str = "General Role";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockQuestions {
    #[serde(default)]
    pub technical_questions: Vec<String>,
    #[serde(default)]
    pub behavioral_questions: Vec<String>,
}

impl MockQuestions {
    /// Fixed question set used whenever generation fails.
    pub fn fallback() -> Self {
        Self {
            technical_questions: vec![
                "Can you explain the difference between REST and GraphQL?".to_string(),
                "How do you handle state management in a large React application?".to_string(),
            ],
            behavioral_questions: vec![
                "Describe a time you had a conflict with a team member and how you resolved it."
                    .to_string(),
                "Tell me about a project where you had to learn a new technology quickly."
                    .to_string(),
            ],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.technical_questions.iter().all(|q| q.trim().is_empty())
            && self.behavioral_questions.iter().all(|q| q.trim().is_empty())
    }
}

/// Returns generated questions and whether the fallback set was used.
pub async fn prepare_questions(
    llm: &LlmClient,
    job_description: &str,
    job_role: &str,
    resume_content: &str,
) -> (MockQuestions, bool) {
    match generate_questions(llm, job_description, job_role, resume_content).await {
        Ok(questions) if !questions.is_empty() => (questions, false),
        Ok(_) => {
            warn!("Question generation returned no questions, using fallback set");
            (MockQuestions::fallback(), true)
        }
        Err(e) => {
            warn!("Question generation failed, using fallback set: {e}");
            (MockQuestions::fallback(), true)
        }
    }
}

async fn generate_questions(
    llm: &LlmClient,
    job_description: &str,
    job_role: &str,
    resume_content: &str,
) -> Result<MockQuestions, LlmError> {
    let prompt = fill_prompt(
        QUESTIONS_PROMPT_TEMPLATE,
        &[
            ("job_role", job_role),
            ("job_description", job_description),
            ("resume_content", resume_content),
        ],
    );

    llm.call_json(&prompt, JSON_ONLY_SYSTEM).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::parse_json_object;

    #[test]
    fn test_fallback_has_two_of_each() {
        let q = MockQuestions::fallback();
        assert_eq!(q.technical_questions.len(), 2);
        assert_eq!(q.behavioral_questions.len(), 2);
        assert!(!q.is_empty());
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let q: MockQuestions =
            parse_json_object(r#"Sure! {"technical_questions": ["What is ownership?"]}"#).unwrap();
        assert_eq!(q.technical_questions, vec!["What is ownership?"]);
        assert!(q.behavioral_questions.is_empty());
    }

    #[test]
    fn test_blank_questions_count_as_empty() {
        let q = MockQuestions {
            technical_questions: vec!["  ".to_string()],
            behavioral_questions: vec![],
        };
        assert!(q.is_empty());
    }
}
