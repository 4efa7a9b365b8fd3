pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::auth::handlers as auth;
use crate::chat;
use crate::interview::handlers as interview;
use crate::recruiter::handlers as recruiter;
use crate::state::AppState;

// Headroom for multipart boundaries and text fields around the file part.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/auth/me", get(auth::handle_me))
        .route(
            "/api/v1/auth/forgot-password",
            post(auth::handle_forgot_password),
        )
        .route(
            "/api/v1/auth/reset-password",
            post(auth::handle_reset_password),
        )
        // Resume analysis
        .route(
            "/api/v1/resume/extract-text",
            post(analysis::handle_extract_text),
        )
        .route("/api/v1/resume/analyze", post(analysis::handle_analyze))
        .route("/api/v1/resume/critique", post(analysis::handle_critique))
        .route("/api/v1/resume/report", post(analysis::handle_report))
        // Mock interview
        .route(
            "/api/v1/interview/questions",
            get(interview::handle_get_questions).post(interview::handle_prepare_questions),
        )
        .route(
            "/api/v1/interview/sessions",
            post(interview::handle_create_session),
        )
        .route(
            "/api/v1/interview/sessions/:id",
            get(interview::handle_get_session),
        )
        .route(
            "/api/v1/interview/sessions/:id/start",
            post(interview::handle_start),
        )
        .route(
            "/api/v1/interview/sessions/:id/recording/start",
            post(interview::handle_start_recording),
        )
        .route(
            "/api/v1/interview/sessions/:id/recording/stop",
            post(interview::handle_stop_recording),
        )
        .route(
            "/api/v1/interview/sessions/:id/transcript",
            put(interview::handle_update_transcript),
        )
        .route(
            "/api/v1/interview/sessions/:id/next",
            post(interview::handle_next_question),
        )
        .route(
            "/api/v1/interview/sessions/:id/finish",
            post(interview::handle_finish),
        )
        .route(
            "/api/v1/interview/sessions/:id/prompt/audio",
            get(interview::handle_prompt_audio),
        )
        .route("/api/v1/interview/feedback", post(interview::handle_feedback))
        // Career chat
        .route("/api/v1/chat", post(chat::handle_chat))
        // Recruiter projects
        .route(
            "/api/v1/projects",
            get(recruiter::handle_list_projects).post(recruiter::handle_create_project),
        )
        .route(
            "/api/v1/projects/:id",
            get(recruiter::handle_get_project)
                .patch(recruiter::handle_update_project)
                .delete(recruiter::handle_delete_project),
        )
        .route(
            "/api/v1/projects/:id/resumes",
            get(recruiter::handle_list_resumes).post(recruiter::handle_upload_resume),
        )
        .route(
            "/api/v1/projects/:id/resumes/:resume_id",
            delete(recruiter::handle_delete_resume),
        )
        .route(
            "/api/v1/projects/:id/shortlist",
            post(recruiter::handle_shortlist),
        )
        .route(
            "/api/v1/projects/:id/resumes/:resume_id/summary",
            post(recruiter::handle_candidate_summary),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
