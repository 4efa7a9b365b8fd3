// Prompt constants for the mock interview module.

/// Question generation prompt. Replace `{job_role}`, `{job_description}` and
/// `{resume_content}` before sending.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"You are an expert technical recruiter interviewing a candidate for the role of {job_role}.

Based on the following job description and resume content, generate:

1. One complex technical question specifically related to the role of {job_role}, the job description, and the candidate's reported experience.
2. One behavioral question to understand how the candidate has approached challenges in this specific domain.

Return a JSON object with this EXACT schema:
{
  "technical_questions": ["..."],
  "behavioral_questions": ["..."]
}

Job Description: {job_description}
Resume Content: {resume_content}"#;

/// Feedback prompt. Replace `{user_name}` and `{answers}` before sending.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"Based on the following interview session, generate:

1. A personalized summary of the candidate's performance.
2. Constructive feedback highlighting strengths and areas for improvement.

Return a JSON object with this EXACT schema:
{
  "summary": "Brief summary of candidate performance.",
  "feedback": "Brief feedback for candidate performance."
}

Candidate Name: {user_name}
Interview Answers:
{answers}"#;
