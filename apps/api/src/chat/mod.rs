pub mod prompts;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::chat::prompts::CAREER_ADVISOR_SYSTEM;
use crate::errors::AppError;
use crate::state::AppState;

pub const OFFLINE_REPLY: &str = "That's a great question! As a career advisor, I recommend \
    tailoring your resume to the specific job description, highlighting your quantifiable \
    achievements, and practicing common interview questions. (Note: AI service is currently \
    in offline mode, so this is a pre-written response.)";

const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    /// True when the fixed offline reply was returned.
    pub offline: bool,
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = validate_message(&req.message)?;
    let prompt = format!("User Query: {message}");

    let response = match state.llm.call_text(&prompt, CAREER_ADVISOR_SYSTEM).await {
        Ok(reply) => ChatResponse {
            reply,
            offline: false,
        },
        Err(e) => {
            warn!("Chat LLM call failed, using offline reply: {e}");
            ChatResponse {
                reply: OFFLINE_REPLY.to_string(),
                offline: true,
            }
        }
    };
    Ok(Json(response))
}

fn validate_message(message: &str) -> Result<&str, AppError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::Validation(format!(
            "message cannot exceed {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(message)
}
