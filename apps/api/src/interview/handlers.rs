use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::interview::feedback::{feedback_or_fallback, InterviewFeedback};
use crate::interview::questions::{prepare_questions, MockQuestions, DEFAULT_JOB_ROLE};
use crate::interview::session::{
    InterviewOutcome, InterviewSession, InterviewState, Step,
};
use crate::interview::store::{load_questions, load_session, save_questions, save_session};
use crate::state::AppState;
use crate::uploads::{extract::extract_pdf_text, read_multipart, validate_pdf};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    #[serde(flatten)]
    pub questions: MockQuestions,
    /// True when the fixed fallback set was returned.
    pub demo_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct AnswerView {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub state: InterviewState,
    pub current_question: Option<String>,
    /// 1-based position of the current question.
    pub question_number: Option<usize>,
    pub total_questions: usize,
    pub transcript: String,
    pub recording: bool,
    pub prompt: Option<String>,
    pub answers: Vec<AnswerView>,
    pub outcome: Option<InterviewOutcome>,
}

impl From<&InterviewSession> for SessionView {
    fn from(session: &InterviewSession) -> Self {
        let question_number = match session.state {
            InterviewState::InProgress { index } => Some(index + 1),
            _ => None,
        };
        Self {
            id: session.id,
            state: session.state.clone(),
            current_question: session.current_question().map(str::to_string),
            question_number,
            total_questions: session.questions.len(),
            transcript: session.transcript.clone(),
            recording: session.recording,
            prompt: session.prompt.clone(),
            answers: session
                .answers_in_order()
                .into_iter()
                .map(|(question, answer)| AnswerView { question, answer })
                .collect(),
            outcome: session.outcome.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    pub transcript: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub user_name: String,
    pub answers: HashMap<String, String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Questions
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interview/questions
///
/// Multipart: `jobDescription` (required), `jobRole` (optional), `file` (optional PDF resume).
pub async fn handle_prepare_questions(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<QuestionsResponse>, AppError> {
    let mut form = read_multipart(&mut multipart, "file").await?;

    let job_description = form
        .text("jobDescription")
        .map(str::trim)
        .filter(|jd| !jd.is_empty())
        .ok_or_else(|| AppError::Validation("jobDescription cannot be empty".to_string()))?
        .to_string();
    let job_role = form
        .text("jobRole")
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_JOB_ROLE)
        .to_string();

    let resume_content = match form.file.take() {
        Some(file) => {
            validate_pdf(&file, state.config.max_upload_bytes)?;
            extract_pdf_text(file.bytes).await?
        }
        None => String::new(),
    };

    let (questions, demo_mode) =
        prepare_questions(&state.llm, &job_description, &job_role, &resume_content).await;
    save_questions(&state.redis, auth.user.id, &questions).await?;

    info!(user_id = %auth.user.id, demo_mode, "Mock interview questions prepared");
    Ok(Json(QuestionsResponse {
        questions,
        demo_mode,
    }))
}

/// GET /api/v1/interview/questions
pub async fn handle_get_questions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MockQuestions>, AppError> {
    let questions = load_questions(&state.redis, auth.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No mock questions prepared".to_string()))?;
    Ok(Json(questions))
}

// ────────────────────────────────────────────────────────────────────────────
// Sessions
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interview/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let questions = load_questions(&state.redis, auth.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No mock questions prepared".to_string()))?;

    let session = InterviewSession::new(auth.user.id, &auth.user.name, &questions);
    save_session(&state.redis, &session).await?;

    info!(user_id = %auth.user.id, session_id = %session.id, "Interview session created");
    Ok((StatusCode::CREATED, Json(SessionView::from(&session))))
}

/// GET /api/v1/interview/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = load_session(&state.redis, id, auth.user.id).await?;
    Ok(Json(SessionView::from(&session)))
}

/// POST /api/v1/interview/sessions/:id/start
pub async fn handle_start(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = load_session(&state.redis, id, auth.user.id).await?;
    session.start()?;
    save_session(&state.redis, &session).await?;
    Ok(Json(SessionView::from(&session)))
}

/// POST /api/v1/interview/sessions/:id/recording/start
pub async fn handle_start_recording(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = load_session(&state.redis, id, auth.user.id).await?;
    if !session.recording {
        session.start_recording()?;
        save_session(&state.redis, &session).await?;
    }
    Ok(Json(SessionView::from(&session)))
}

/// POST /api/v1/interview/sessions/:id/recording/stop
pub async fn handle_stop_recording(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = load_session(&state.redis, id, auth.user.id).await?;
    if session.recording {
        session.stop_recording()?;
        save_session(&state.redis, &session).await?;
    }
    Ok(Json(SessionView::from(&session)))
}

/// PUT /api/v1/interview/sessions/:id/transcript
pub async fn handle_update_transcript(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<TranscriptRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = load_session(&state.redis, id, auth.user.id).await?;
    session.update_transcript(&req.transcript)?;
    save_session(&state.redis, &session).await?;
    Ok(Json(SessionView::from(&session)))
}

/// POST /api/v1/interview/sessions/:id/next
pub async fn handle_next_question(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = load_session(&state.redis, id, auth.user.id).await?;
    if session.next_question()? == Step::Completed {
        attach_outcome(&state, &mut session).await;
    }
    save_session(&state.redis, &session).await?;
    Ok(Json(SessionView::from(&session)))
}

/// POST /api/v1/interview/sessions/:id/finish
pub async fn handle_finish(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = load_session(&state.redis, id, auth.user.id).await?;
    session.finish()?;
    attach_outcome(&state, &mut session).await;
    save_session(&state.redis, &session).await?;
    Ok(Json(SessionView::from(&session)))
}

/// GET /api/v1/interview/sessions/:id/prompt/audio
///
/// Voice prompts are best-effort: any synthesis failure answers 204.
pub async fn handle_prompt_audio(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = load_session(&state.redis, id, auth.user.id).await?;
    let Some(prompt) = session.prompt.as_deref() else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    match state.tts.synthesize(prompt).await {
        Ok(audio) => Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response()),
        Err(e) => {
            warn!(session_id = %id, "Voice prompt synthesis failed: {e}");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

async fn attach_outcome(state: &AppState, session: &mut InterviewSession) {
    let answers = session.answers_in_order();
    let outcome = feedback_or_fallback(&state.llm, &session.user_name, &answers).await;
    info!(
        session_id = %session.id,
        answered = answers.len(),
        demo_mode = outcome.demo_mode,
        "Interview completed"
    );
    session.set_outcome(outcome);
}

// ────────────────────────────────────────────────────────────────────────────
// Stateless feedback
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interview/feedback
pub async fn handle_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<InterviewFeedback>, AppError> {
    if req.answers.is_empty() {
        return Err(AppError::Validation("answers cannot be empty".to_string()));
    }

    let user_name = match req.user_name.trim() {
        "" => "Anonymous",
        name => name,
    };
    let mut answers: Vec<(String, String)> = req.answers.into_iter().collect();
    answers.sort();

    let outcome = feedback_or_fallback(&state.llm, user_name, &answers).await;
    Ok(Json(InterviewFeedback {
        summary: outcome.summary,
        feedback: outcome.feedback,
    }))
}
