//! Deterministic ATS scorer: pure Rust, no LLM call.
//!
//! Algorithm:
//! 1. Normalize text (lowercase, keep `+ % $ .`, collapse whitespace)
//! 2. Reject documents that do not look like resumes (e.g. exam papers)
//! 3. structure = sections found / 4 × 20
//! 4. impact = min(20, metric mentions × 4)
//! 5. keyword = TF-IDF cosine(job, resume) × 100
//! 6. coverage = job words (len > 3) present in resume / job words × 100
//! 7. final = keyword × 0.45 + coverage × 0.20 + structure + impact,
//!    +15 for substantial resumes scoring under 40, capped at 98

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generic software-engineering JD used when the caller supplies none.
pub const DEFAULT_JOB_DESCRIPTION: &str = "\
Software Engineer.
Proficient in Python, Java, JavaScript, React, Node.js, SQL.
Experience with cloud platforms like AWS, Azure, or Google Cloud.
Understanding of algorithms, data structures, and software design patterns.
Experience with RESTful APIs, Git, Docker, CI/CD and Agile methodologies.
Strong problem-solving skills, communication, and ability to work in a team.
Bachelor's degree in Computer Science or related field.";

const SECTIONS: &[(&str, &[&str])] = &[
    (
        "Education",
        &["education", "academic", "university", "college", "degree", "bachelor", "master", "phd"],
    ),
    (
        "Experience",
        &["experience", "employment", "work history", "history", "professional"],
    ),
    (
        "Skills",
        &["skills", "technologies", "technical", "stack", "proficiencies"],
    ),
    ("Projects", &["projects", "personal projects", "portfolio"]),
];

const RESUME_INDICATORS: &[&str] = &[
    "education",
    "experience",
    "skills",
    "projects",
    "summary",
    "profile",
    "work history",
    "contact",
    "email",
    "phone",
];

const NON_RESUME_INDICATORS: &[&str] = &[
    "question paper",
    "marks",
    "part a",
    "part b",
    "semester",
    "examination",
    "max marks",
    "instructions",
    "module",
];

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "etc",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "like",
    "may", "me", "more", "most", "must", "my", "no", "nor", "not", "now", "of", "off", "on",
    "once", "only", "or", "other", "our", "ours", "out", "over", "own", "per", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "them", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "us",
    "very", "via", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "within", "would", "you", "your", "yours",
];

static NON_TEXT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9+\s%\$\.]").expect("Invalid clean-text regex"));

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static METRICS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d+%|\$\d+|\d+\+ years|\d+ users|\d+ customers|increased by|reduced by|improved by)",
    )
    .expect("Invalid metrics regex")
});

static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("Invalid token regex"));

#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct InvalidDocument {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub keyword_match: u32,
    pub coverage: u32,
    pub structure: u32,
    pub impact: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeScore {
    pub final_score: u32, // 0 – 98
    pub breakdown: ScoreBreakdown,
    pub found_sections: Vec<String>,
    pub missing_sections: Vec<String>,
    pub impact_count: usize,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>, // at most 8
}

/// Scores a resume against a job description (or the default JD when blank).
pub fn score_resume(resume_text: &str, job_text: &str) -> Result<ResumeScore, InvalidDocument> {
    let cleaned_resume = clean_text(resume_text);

    if !is_valid_resume(&cleaned_resume) {
        return Err(InvalidDocument {
            message: "The uploaded document does not appear to be a resume. \
                It resembles a question paper or other non-resume document."
                .to_string(),
        });
    }

    let job_text = if job_text.trim().is_empty() {
        DEFAULT_JOB_DESCRIPTION
    } else {
        job_text
    };
    let cleaned_job = clean_text(job_text);

    let (found_sections, missing_sections) = analyze_structure(&cleaned_resume);
    let structure_score = found_sections.len() as f64 / SECTIONS.len() as f64 * 20.0;

    let impact_count = METRICS_REGEX.find_iter(&cleaned_resume).count();
    let impact_score = (impact_count as f64 * 4.0).min(20.0);

    let keyword_score = tfidf_cosine(&cleaned_job, &cleaned_resume) * 100.0;

    let job_words: BTreeSet<&str> = cleaned_job
        .split_whitespace()
        .filter(|w| w.chars().count() > 3)
        .collect();
    let resume_words: HashSet<&str> = cleaned_resume.split_whitespace().collect();
    let matched: Vec<String> = job_words
        .iter()
        .filter(|w| resume_words.contains(*w))
        .map(|w| w.to_string())
        .collect();
    let missing: Vec<String> = job_words
        .iter()
        .filter(|w| !resume_words.contains(*w))
        .take(8)
        .map(|w| w.to_string())
        .collect();
    let coverage = if job_words.is_empty() {
        0.0
    } else {
        matched.len() as f64 / job_words.len() as f64 * 100.0
    };

    let mut final_score =
        keyword_score * 0.45 + coverage * 0.20 + structure_score + impact_score;
    if cleaned_resume.len() > 200 && final_score < 40.0 {
        final_score += 15.0;
    }

    Ok(ResumeScore {
        final_score: final_score.min(98.0) as u32,
        breakdown: ScoreBreakdown {
            keyword_match: keyword_score as u32,
            coverage: coverage as u32,
            structure: structure_score as u32,
            impact: impact_score as u32,
        },
        found_sections,
        missing_sections,
        impact_count,
        matched_keywords: matched,
        missing_keywords: missing,
    })
}

/// Shortlisting treats unreadable or non-resume documents as a zero score.
pub fn score_or_zero(resume_text: &str, job_text: &str) -> u32 {
    score_resume(resume_text, job_text)
        .map(|s| s.final_score)
        .unwrap_or(0)
}

fn clean_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let kept = NON_TEXT_REGEX.replace_all(&lower, " ");
    WHITESPACE_REGEX.replace_all(&kept, " ").trim().to_string()
}

fn is_valid_resume(text_lower: &str) -> bool {
    let resume_score = RESUME_INDICATORS
        .iter()
        .filter(|kw| text_lower.contains(*kw))
        .count();
    let non_resume_score = NON_RESUME_INDICATORS
        .iter()
        .filter(|kw| text_lower.contains(*kw))
        .count();

    if non_resume_score > 2 && non_resume_score >= resume_score {
        return false;
    }
    resume_score >= 2
}

fn analyze_structure(text_lower: &str) -> (Vec<String>, Vec<String>) {
    let mut found = Vec::new();
    let mut missing = Vec::new();
    for (section, keywords) in SECTIONS {
        if keywords.iter().any(|kw| text_lower.contains(kw)) {
            found.push(section.to_string());
        } else {
            missing.push(section.to_string());
        }
    }
    (found, missing)
}

fn tokenize(text: &str) -> Vec<&str> {
    TOKEN_REGEX
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|t| !STOP_WORDS.contains(t))
        .collect()
}

/// Cosine similarity of smoothed TF-IDF vectors for a two-document corpus.
fn tfidf_cosine(a: &str, b: &str) -> f64 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let tf_a = term_counts(&tokens_a);
    let tf_b = term_counts(&tokens_b);

    // idf = ln((1 + n) / (1 + df)) + 1 with n = 2
    let idf = |term: &str| -> f64 {
        let df = tf_a.contains_key(term) as u32 + tf_b.contains_key(term) as u32;
        (3.0 / (1.0 + df as f64)).ln() + 1.0
    };

    let weigh = |tf: &HashMap<&str, u32>| -> HashMap<String, f64> {
        let mut weights: HashMap<String, f64> = tf
            .iter()
            .map(|(term, count)| (term.to_string(), *count as f64 * idf(*term)))
            .collect();
        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in weights.values_mut() {
                *w /= norm;
            }
        }
        weights
    };

    let wa = weigh(&tf_a);
    let wb = weigh(&tf_b);
    wa.iter()
        .filter_map(|(term, w)| wb.get(term).map(|v| w * v))
        .sum::<f64>()
        .clamp(0.0, 1.0)
}

fn term_counts<'a>(tokens: &[&'a str]) -> HashMap<&'a str, u32> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(*token).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRONG_RESUME: &str = "\
Jane Doe | jane@example.com | phone 555-0100
Summary: Backend engineer with 6+ years building Python and SQL services on AWS.
Experience
Senior Engineer, Acme Corp. Reduced latency by 40% and increased by 25% throughput.
Served 20000 users across 300 customers. Built RESTful APIs with Docker and Git.
Education
Bachelor of Science in Computer Science, State University.
Skills
Python, Java, JavaScript, React, SQL, AWS, Docker, Git, CI/CD, Agile.
Projects
Open-source data structures library and algorithms visualizer.";

    const QUESTION_PAPER: &str = "\
Semester Examination - Question Paper
Instructions: Answer all questions. Max marks: 100.
Part A: Module 1. Part B: Module 2.";

    #[test]
    fn test_question_paper_is_rejected() {
        let err = score_resume(QUESTION_PAPER, "").unwrap_err();
        assert!(err.message.contains("does not appear to be a resume"));
    }

    #[test]
    fn test_strong_resume_finds_all_sections() {
        let score = score_resume(STRONG_RESUME, "").unwrap();
        assert!(score.missing_sections.is_empty());
        assert_eq!(score.breakdown.structure, 20);
    }

    #[test]
    fn test_impact_is_capped_at_twenty() {
        let score = score_resume(STRONG_RESUME, "").unwrap();
        assert!(score.impact_count >= 5);
        assert_eq!(score.breakdown.impact, 20);
    }

    #[test]
    fn test_final_score_never_exceeds_98() {
        let score = score_resume(STRONG_RESUME, STRONG_RESUME).unwrap();
        assert!(score.final_score <= 98);
    }

    #[test]
    fn test_missing_keywords_are_capped_at_eight() {
        let jd = "kubernetes terraform ansible prometheus grafana elasticsearch \
                  kafka rabbitmq cassandra snowflake airflow";
        let score = score_resume(STRONG_RESUME, jd).unwrap();
        assert_eq!(score.missing_keywords.len(), 8);
        assert!(score.missing_keywords.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_matching_jd_scores_higher_than_unrelated_jd() {
        let related = score_resume(STRONG_RESUME, "Python SQL AWS Docker backend engineer").unwrap();
        let unrelated =
            score_resume(STRONG_RESUME, "Pastry chef croissant lamination sourdough").unwrap();
        assert!(related.final_score > unrelated.final_score);
    }

    #[test]
    fn test_tfidf_cosine_identical_documents_is_one() {
        let sim = tfidf_cosine("rust tokio axum", "rust tokio axum");
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tfidf_cosine_disjoint_documents_is_zero() {
        assert_eq!(tfidf_cosine("rust tokio", "pastry oven"), 0.0);
    }

    #[test]
    fn test_clean_text_keeps_metric_characters() {
        assert_eq!(clean_text("Grew ARR 30%, saved $5K!"), "grew arr 30% saved $5k");
    }

    #[test]
    fn test_score_or_zero_for_invalid_document() {
        assert_eq!(score_or_zero(QUESTION_PAPER, "anything"), 0);
    }
}
