// Prompt constants for the recruiter module.

/// Candidate summary prompt. Replace `{resume_content}` and `{job_description}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = "Given the resume content:
{resume_content}

And the job description:
{job_description}

Explain in detail why this candidate was shortlisted for the job.";
