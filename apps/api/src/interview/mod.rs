// Mock interview: question preparation, the session state machine, Redis-backed
// session storage, feedback generation and spoken prompts.
// All LLM calls go through llm_client; audio goes through tts.

pub mod feedback;
pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod session;
pub mod store;
