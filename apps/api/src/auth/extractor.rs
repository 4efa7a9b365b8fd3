use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use super::db::get_user_from_token;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// Extractor that validates the `Authorization: Bearer <token>` header and
/// provides the authenticated user along with the presented token.
pub struct AuthUser {
    pub user: User,
    pub token: String,
}

/// Like `AuthUser`, but rejects anyone whose role is not recruiter.
pub struct RecruiterUser(pub User);

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header format".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.to_string();

        let user = get_user_from_token(&state.db, &token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(AuthUser { user, token })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RecruiterUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser { user, .. } = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_recruiter() {
            return Err(AppError::Forbidden);
        }
        Ok(RecruiterUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header_value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(v) = header_value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_is_extracted() {
        let parts = parts_with(Some("Bearer abc123"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc123");
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let parts = parts_with(None);
        assert!(matches!(bearer_token(&parts), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_non_bearer_scheme_is_unauthorized() {
        let parts = parts_with(Some("Basic dXNlcjpwYXNz"));
        assert!(matches!(bearer_token(&parts), Err(AppError::Unauthorized(_))));
        let parts = parts_with(Some("Bearer    "));
        assert!(matches!(bearer_token(&parts), Err(AppError::Unauthorized(_))));
    }
}
