use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::questions::MockQuestions;
use crate::interview::session::InterviewSession;

// Last writer wins; every key expires after a day.
const TTL_SECONDS: u64 = 24 * 60 * 60;

fn questions_key(user_id: Uuid) -> String {
    format!("mitra:interview:questions:{user_id}")
}

fn session_key(session_id: Uuid) -> String {
    format!("mitra:interview:session:{session_id}")
}

pub async fn save_questions(
    redis: &redis::Client,
    user_id: Uuid,
    questions: &MockQuestions,
) -> Result<(), AppError> {
    put_json(redis, &questions_key(user_id), questions).await
}

pub async fn load_questions(
    redis: &redis::Client,
    user_id: Uuid,
) -> Result<Option<MockQuestions>, AppError> {
    get_json(redis, &questions_key(user_id)).await
}

pub async fn save_session(redis: &redis::Client, session: &InterviewSession) -> Result<(), AppError> {
    put_json(redis, &session_key(session.id), session).await
}

/// Loads a session owned by `user_id`. Other users' sessions read as not found.
pub async fn load_session(
    redis: &redis::Client,
    session_id: Uuid,
    user_id: Uuid,
) -> Result<InterviewSession, AppError> {
    get_json::<InterviewSession>(redis, &session_key(session_id))
        .await?
        .filter(|s| s.user_id == user_id)
        .ok_or_else(|| AppError::NotFound(format!("Interview session {session_id} not found")))
}

async fn put_json<T: Serialize>(redis: &redis::Client, key: &str, value: &T) -> Result<(), AppError> {
    let payload = serde_json::to_string(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize {key}: {e}")))?;
    let mut conn = redis.get_multiplexed_async_connection().await?;
    conn.set_ex::<_, _, ()>(key, payload, TTL_SECONDS).await?;
    Ok(())
}

async fn get_json<T: DeserializeOwned>(
    redis: &redis::Client,
    key: &str,
) -> Result<Option<T>, AppError> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    let raw: Option<String> = conn.get(key).await?;
    raw.map(|payload| {
        serde_json::from_str(&payload)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Corrupt value at {key}: {e}")))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_namespaced() {
        let id = Uuid::nil();
        assert_eq!(
            questions_key(id),
            "mitra:interview:questions:00000000-0000-0000-0000-000000000000"
        );
        assert!(session_key(id).starts_with("mitra:interview:session:"));
    }
}
