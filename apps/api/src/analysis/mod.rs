// Resume analysis: PDF text extraction, deterministic ATS scoring, AI critique,
// parsing of free-form analysis text, and the downloadable PDF report.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod parser;
pub mod pdf;
pub mod prompts;
pub mod report;
pub mod scorer;
