// Prompt constants for the resume analysis module.

/// Critique prompt. Replace `{job_description}` and `{resume_text}` before sending.
/// The headings match the vocabulary `parser::parse_analysis_text` understands.
pub const CRITIQUE_PROMPT_TEMPLATE: &str = r#"You are an expert ATS (Applicant Tracking System) reviewer.
Critique the resume below against the job description.

Respond in plain text using exactly these four headings, in this order:

**ATS Score**
<a whole number from 0 to 100>/100

**Strengths**
* **<short label>:** <one sentence>

**Weaknesses**
* **<short label>:** <one sentence>

**Suggestions**
* **<short label>:** <one actionable sentence>

Give two to four bullets per section. Do not add any other headings.

Job Description:
{job_description}

Resume:
{resume_text}"#;
