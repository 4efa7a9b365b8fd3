//! Mock-interview session state machine.
//!
//! `NotStarted → InProgress { index } → Complete`. Questions are asked
//! behavioral first, then technical. Answers come from the live transcript,
//! which the client replaces as speech recognition produces results.
//! All transitions are pure; persistence and feedback generation live in the
//! handlers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::questions::MockQuestions;

pub const COMPLETION_PROMPT: &str =
    "Thank you for completing the interview. Your responses and feedback have been saved.";
pub const COMPLETION_PROMPT_DEMO: &str =
    "Thank you for completing the interview. Your responses have been saved (Demo Mode).";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InterviewState {
    NotStarted,
    InProgress { index: usize },
    Complete,
}

#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("No interview questions are available. Prepare questions first.")]
    NoQuestions,

    #[error("The interview has already started.")]
    AlreadyStarted,

    #[error("The interview has not started yet.")]
    NotStarted,

    #[error("The interview is already complete.")]
    AlreadyComplete,

    #[error("Please provide an answer before moving on.")]
    EmptyAnswer,
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::NoQuestions | TransitionError::EmptyAnswer => {
                AppError::Validation(e.to_string())
            }
            TransitionError::AlreadyStarted
            | TransitionError::NotStarted
            | TransitionError::AlreadyComplete => AppError::Conflict(e.to_string()),
        }
    }
}

/// Result of `next_question`.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Asked { index: usize },
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewOutcome {
    pub summary: String,
    pub feedback: String,
    /// True when the fixed fallback summary/feedback was used.
    pub demo_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub questions: Vec<String>,
    pub state: InterviewState,
    /// Keyed by question text.
    pub answers: BTreeMap<String, String>,
    pub transcript: String,
    pub recording: bool,
    /// Latest spoken prompt; served by the audio endpoint.
    pub prompt: Option<String>,
    pub outcome: Option<InterviewOutcome>,
    pub created_at: DateTime<Utc>,
}

impl InterviewSession {
    pub fn new(user_id: Uuid, user_name: &str, questions: &MockQuestions) -> Self {
        let ordered = questions
            .behavioral_questions
            .iter()
            .chain(questions.technical_questions.iter())
            .filter(|q| !q.trim().is_empty())
            .cloned()
            .collect();

        Self {
            id: Uuid::new_v4(),
            user_id,
            user_name: user_name.to_string(),
            questions: ordered,
            state: InterviewState::NotStarted,
            answers: BTreeMap::new(),
            transcript: String::new(),
            recording: false,
            prompt: Some(format!(
                "Hello {user_name}, welcome to the Interview and we will start it in few seconds"
            )),
            outcome: None,
            created_at: Utc::now(),
        }
    }

    pub fn current_question(&self) -> Option<&str> {
        match self.state {
            InterviewState::InProgress { index } => self.questions.get(index).map(String::as_str),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == InterviewState::Complete
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        match self.state {
            InterviewState::NotStarted => {}
            InterviewState::InProgress { .. } => return Err(TransitionError::AlreadyStarted),
            InterviewState::Complete => return Err(TransitionError::AlreadyComplete),
        }
        let first = self.questions.first().ok_or(TransitionError::NoQuestions)?;
        self.prompt = Some(format!("Let's begin with the first question: {first}"));
        self.state = InterviewState::InProgress { index: 0 };
        Ok(())
    }

    /// No-op when already recording.
    pub fn start_recording(&mut self) -> Result<(), TransitionError> {
        self.ensure_not_complete()?;
        self.recording = true;
        Ok(())
    }

    /// No-op when not recording.
    pub fn stop_recording(&mut self) -> Result<(), TransitionError> {
        self.ensure_not_complete()?;
        self.recording = false;
        Ok(())
    }

    /// Replaces the live transcript; the latest recognition result wins.
    pub fn update_transcript(&mut self, text: &str) -> Result<(), TransitionError> {
        self.in_progress_index()?;
        self.transcript = text.to_string();
        Ok(())
    }

    /// Stores the transcript as the current answer and advances. An empty
    /// transcript leaves the index unchanged.
    pub fn next_question(&mut self) -> Result<Step, TransitionError> {
        let index = self.in_progress_index()?;
        self.record_current_answer(index)?;

        let next = index + 1;
        match self.questions.get(next) {
            Some(question) => {
                self.prompt = Some(format!("Next question: {question}"));
                self.state = InterviewState::InProgress { index: next };
                Ok(Step::Asked { index: next })
            }
            None => {
                self.mark_complete();
                Ok(Step::Completed)
            }
        }
    }

    /// Ends the interview early, recording the answer to the current question.
    pub fn finish(&mut self) -> Result<(), TransitionError> {
        let index = self.in_progress_index()?;
        self.record_current_answer(index)?;
        self.mark_complete();
        Ok(())
    }

    /// Attaches the summary/feedback and the matching closing prompt.
    pub fn set_outcome(&mut self, outcome: InterviewOutcome) {
        self.prompt = Some(
            if outcome.demo_mode {
                COMPLETION_PROMPT_DEMO
            } else {
                COMPLETION_PROMPT
            }
            .to_string(),
        );
        self.outcome = Some(outcome);
    }

    /// Answered questions in asking order.
    pub fn answers_in_order(&self) -> Vec<(String, String)> {
        self.questions
            .iter()
            .filter_map(|q| self.answers.get(q).map(|a| (q.clone(), a.clone())))
            .collect()
    }

    fn record_current_answer(&mut self, index: usize) -> Result<(), TransitionError> {
        let answer = self.transcript.trim();
        if answer.is_empty() {
            return Err(TransitionError::EmptyAnswer);
        }
        if let Some(question) = self.questions.get(index) {
            self.answers.insert(question.clone(), answer.to_string());
        }
        self.transcript.clear();
        Ok(())
    }

    fn mark_complete(&mut self) {
        self.state = InterviewState::Complete;
        self.recording = false;
    }

    fn in_progress_index(&self) -> Result<usize, TransitionError> {
        match self.state {
            InterviewState::InProgress { index } => Ok(index),
            InterviewState::NotStarted => Err(TransitionError::NotStarted),
            InterviewState::Complete => Err(TransitionError::AlreadyComplete),
        }
    }

    fn ensure_not_complete(&self) -> Result<(), TransitionError> {
        if self.is_complete() {
            return Err(TransitionError::AlreadyComplete);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> MockQuestions {
        MockQuestions {
            technical_questions: vec!["T1".to_string(), "T2".to_string()],
            behavioral_questions: vec!["B1".to_string()],
        }
    }

    fn started() -> InterviewSession {
        let mut session = InterviewSession::new(Uuid::new_v4(), "Ada", &questions());
        session.start().unwrap();
        session
    }

    #[test]
    fn test_behavioral_questions_come_first() {
        let session = InterviewSession::new(Uuid::new_v4(), "Ada", &questions());
        assert_eq!(session.questions, vec!["B1", "T1", "T2"]);
        assert_eq!(
            session.prompt.as_deref(),
            Some("Hello Ada, welcome to the Interview and we will start it in few seconds")
        );
    }

    #[test]
    fn test_start_asks_first_question() {
        let session = started();
        assert_eq!(session.state, InterviewState::InProgress { index: 0 });
        assert_eq!(
            session.prompt.as_deref(),
            Some("Let's begin with the first question: B1")
        );
        assert_eq!(session.current_question(), Some("B1"));
    }

    #[test]
    fn test_start_requires_questions() {
        let empty = MockQuestions {
            technical_questions: vec![],
            behavioral_questions: vec![],
        };
        let mut session = InterviewSession::new(Uuid::new_v4(), "Ada", &empty);
        assert_eq!(session.start(), Err(TransitionError::NoQuestions));
        assert_eq!(session.state, InterviewState::NotStarted);
    }

    #[test]
    fn test_starting_twice_is_an_error() {
        let mut session = started();
        assert_eq!(session.start(), Err(TransitionError::AlreadyStarted));
    }

    #[test]
    fn test_next_with_empty_transcript_keeps_index() {
        let mut session = started();
        session.update_transcript("   ").unwrap();
        assert_eq!(session.next_question(), Err(TransitionError::EmptyAnswer));
        assert_eq!(session.state, InterviewState::InProgress { index: 0 });
        assert!(session.answers.is_empty());
    }

    #[test]
    fn test_next_records_answer_and_clears_transcript() {
        let mut session = started();
        session.update_transcript("I listened first").unwrap();
        assert_eq!(session.next_question(), Ok(Step::Asked { index: 1 }));
        assert_eq!(session.answers.get("B1").map(String::as_str), Some("I listened first"));
        assert!(session.transcript.is_empty());
        assert_eq!(session.prompt.as_deref(), Some("Next question: T1"));
    }

    #[test]
    fn test_next_on_last_question_completes() {
        let mut session = started();
        for answer in ["a1", "a2"] {
            session.update_transcript(answer).unwrap();
            session.next_question().unwrap();
        }
        session.update_transcript("a3").unwrap();
        assert_eq!(session.next_question(), Ok(Step::Completed));
        assert!(session.is_complete());
        assert_eq!(session.answers.len(), 3);
    }

    #[test]
    fn test_finish_records_answer_from_any_index() {
        let mut session = started();
        session.update_transcript("only answer").unwrap();
        session.finish().unwrap();
        assert!(session.is_complete());
        assert_eq!(
            session.answers_in_order(),
            vec![("B1".to_string(), "only answer".to_string())]
        );
    }

    #[test]
    fn test_finish_requires_answer() {
        let mut session = started();
        assert_eq!(session.finish(), Err(TransitionError::EmptyAnswer));
        assert!(!session.is_complete());
    }

    #[test]
    fn test_recording_toggles_are_idempotent() {
        let mut session = started();
        session.stop_recording().unwrap();
        assert!(!session.recording);
        session.start_recording().unwrap();
        session.start_recording().unwrap();
        assert!(session.recording);
        session.stop_recording().unwrap();
        session.stop_recording().unwrap();
        assert!(!session.recording);
    }

    #[test]
    fn test_latest_transcript_wins() {
        let mut session = started();
        session.update_transcript("first draft").unwrap();
        session.update_transcript("final answer").unwrap();
        session.next_question().unwrap();
        assert_eq!(session.answers["B1"], "final answer");
    }

    #[test]
    fn test_transcript_before_start_is_rejected() {
        let mut session = InterviewSession::new(Uuid::new_v4(), "Ada", &questions());
        assert_eq!(session.update_transcript("hi"), Err(TransitionError::NotStarted));
    }

    #[test]
    fn test_outcome_sets_completion_prompt() {
        let mut session = started();
        session.update_transcript("done").unwrap();
        session.finish().unwrap();
        session.set_outcome(InterviewOutcome {
            summary: "s".to_string(),
            feedback: "f".to_string(),
            demo_mode: true,
        });
        assert_eq!(session.prompt.as_deref(), Some(COMPLETION_PROMPT_DEMO));
        assert_eq!(session.start_recording(), Err(TransitionError::AlreadyComplete));
    }

    #[test]
    fn test_session_survives_json_round_trip() {
        let session = started();
        let json = serde_json::to_string(&session).unwrap();
        let restored: InterviewSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.state, InterviewState::InProgress { index: 0 });
        assert_eq!(restored.questions, session.questions);
    }
}
