//! Text-to-speech for interview voice prompts.
//!
//! The API key stays on the server; clients fetch finished `audio/mpeg` bytes.
//! `AppState` holds an `Arc<dyn Synthesizer>`, chosen at startup: ElevenLabs
//! when `TTS_API_KEY` is set, otherwise `DisabledSynthesizer`.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech";

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Text-to-speech is not configured")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Nothing to synthesize")]
    EmptyText,
}

#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Returns MP3 audio for `text`.
    async fn synthesize(&self, text: &str) -> Result<Bytes, TtsError>;
}

// ────────────────────────────────────────────────────────────────────────────
// ElevenLabsSynthesizer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    voice_settings: VoiceSettings,
}

pub struct ElevenLabsSynthesizer {
    http: reqwest::Client,
    api_key: String,
    voice_id: String,
}

impl ElevenLabsSynthesizer {
    pub fn new(api_key: String, voice_id: String) -> Result<Self, TtsError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            api_key,
            voice_id,
        })
    }

    fn stream_url(&self) -> String {
        format!("{ELEVENLABS_BASE_URL}/{}/stream", self.voice_id)
    }
}

#[async_trait]
impl Synthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Bytes, TtsError> {
        if text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }

        let response = self
            .http
            .post(self.stream_url())
            .header("xi-api-key", &self.api_key)
            .header("accept", "audio/mpeg")
            .json(&SpeechRequest {
                text,
                voice_settings: VoiceSettings {
                    stability: 0.1,
                    similarity_boost: 0.3,
                },
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TtsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes().await?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// DisabledSynthesizer
// ────────────────────────────────────────────────────────────────────────────

/// Used when no TTS key is configured. Every call fails with `Disabled`.
pub struct DisabledSynthesizer;

#[async_trait]
impl Synthesizer for DisabledSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Bytes, TtsError> {
        Err(TtsError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_synthesizer_always_fails() {
        let err = DisabledSynthesizer.synthesize("hello").await.unwrap_err();
        assert!(matches!(err, TtsError::Disabled));
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected_before_any_request() {
        let tts = ElevenLabsSynthesizer::new("key".to_string(), "voice".to_string()).unwrap();
        let err = tts.synthesize("   ").await.unwrap_err();
        assert!(matches!(err, TtsError::EmptyText));
    }

    #[test]
    fn test_stream_url_includes_voice() {
        let tts =
            ElevenLabsSynthesizer::new("key".to_string(), "cgSgspJ2msm6clMCkdW9".to_string()).unwrap();
        assert_eq!(
            tts.stream_url(),
            "https://api.elevenlabs.io/v1/text-to-speech/cgSgspJ2msm6clMCkdW9/stream"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(SpeechRequest {
            text: "Next question: T1",
            voice_settings: VoiceSettings {
                stability: 0.1,
                similarity_boost: 0.3,
            },
        })
        .unwrap();
        assert_eq!(body["text"], "Next question: T1");
        assert!(body["voice_settings"]["stability"].is_number());
    }
}
