use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::crypto::{spawn_hash_password, spawn_verify_password};
use super::db::{
    consume_password_reset, create_password_reset, create_session, delete_session,
    find_user_by_email, insert_user,
};
use super::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::user::{Role, User};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 6;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/signup
///
/// Creates the account and signs it in.
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let (name, email) = validate_signup(&req)?;

    let password_hash = spawn_hash_password(req.password.clone()).await?;

    let user = match insert_user(&state.db, &email, &name, req.role, &password_hash).await {
        Ok(user) => user,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(AppError::Conflict(
                "Email already in use. Please log in.".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    let token = create_session(&state.db, user.id, state.config.session_ttl_days).await?;
    info!(user_id = %user.id, role = %req.role, "User signed up");

    Ok((StatusCode::CREATED, Json(SessionResponse { token, user })))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let invalid = || AppError::Unauthorized("Invalid email or password.".to_string());

    let user = find_user_by_email(&state.db, req.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !spawn_verify_password(req.password, user.password_hash.clone()).await? {
        return Err(invalid());
    }

    let token = create_session(&state.db, user.id, state.config.session_ttl_days).await?;
    info!(user_id = %user.id, "User logged in");

    Ok(Json(SessionResponse { token, user }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    delete_session(&state.db, &auth.token).await?;
    info!(user_id = %auth.user.id, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}

/// POST /api/v1/auth/forgot-password
///
/// Always answers 202 so the endpoint cannot be used to probe for accounts.
pub async fn handle_forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<StatusCode, AppError> {
    if let Some(user) = find_user_by_email(&state.db, req.email.trim()).await? {
        let token = create_password_reset(&state.db, user.id).await?;
        info!(user_id = %user.id, "Password reset issued");
        // TODO: hand the token to a mail sender once one is configured
        debug!(user_id = %user.id, reset_token = %token, "Password reset token");
    }
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/reset-password
pub async fn handle_reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<StatusCode, AppError> {
    validate_password(&req.new_password)?;

    let password_hash = spawn_hash_password(req.new_password).await?;

    if !consume_password_reset(&state.db, req.token.trim(), &password_hash).await? {
        return Err(AppError::Validation(
            "Reset link is invalid or has expired.".to_string(),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the trimmed name and email.
fn validate_signup(req: &SignupRequest) -> Result<(String, String), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required.".to_string()));
    }

    let email = req.email.trim();
    let well_formed = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.ends_with('.'))
        .unwrap_or(false);
    if !well_formed {
        return Err(AppError::Validation("Please enter a valid email address.".to_string()));
    }

    validate_password(&req.password)?;
    Ok((name.to_string(), email.to_string()))
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password should be at least {MIN_PASSWORD_LEN} characters."
        )));
    }
    Ok(())
}
