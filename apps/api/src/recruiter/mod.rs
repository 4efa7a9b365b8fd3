// Recruiter workspace: projects, candidate resume uploads, shortlisting and
// AI candidate summaries. All routes are recruiter-only and owner-scoped.

pub mod handlers;
pub mod projects;
pub mod prompts;
pub mod resumes;
pub mod shortlist;
pub mod summary;
