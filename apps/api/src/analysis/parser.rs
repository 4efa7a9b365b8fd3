//! Analysis-text parser: turns one block of free-form AI feedback into an
//! `AnalysisResult` with a score and three bullet lists.
//!
//! Headings come from a fixed vocabulary. Each output field accepts a set of
//! synonyms; the earliest synonym found opens the section, and the section runs
//! until the first heading that sits later in `SECTION_ORDER`, or end of text.
//! This function never fails: anything missing falls back to a default.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const SCORE_NOT_AVAILABLE: &str = "Score not available";
pub const DEFAULT_STRENGTHS: &str =
    "Additional feedback needed - Please provide specific strengths";
pub const DEFAULT_WEAKNESSES: &str =
    "Additional feedback needed - Please provide specific areas for improvement";
pub const DEFAULT_SUGGESTIONS: &str =
    "Additional feedback needed - Please provide specific recommendations";

const SECTION_ORDER: [&str; 6] = [
    "ATS Score",
    "Strengths",
    "Weaknesses",
    "Areas for Improvement",
    "Suggestions",
    "Recommendations",
];

static ATS_SCORE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ATS Score\D*(\d+)/100").expect("Invalid ATS score regex"));

static ANY_SCORE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)/100").expect("Invalid score regex"));

static LEADING_MARKUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\*#\-•\s]+").expect("Invalid bullet regex"));

static INLINE_MARKUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\*#]+").expect("Invalid markup regex"));

/// Structured view of one AI analysis response. Every list has at least one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub ats_score: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self {
            ats_score: SCORE_NOT_AVAILABLE.to_string(),
            strengths: vec![DEFAULT_STRENGTHS.to_string()],
            weaknesses: vec![DEFAULT_WEAKNESSES.to_string()],
            suggestions: vec![DEFAULT_SUGGESTIONS.to_string()],
        }
    }
}

impl AnalysisResult {
    /// Drops blank items and fills any empty field with its placeholder, so a
    /// caller-supplied result upholds the same guarantees as a parsed one.
    pub fn normalized(self) -> Self {
        let ats_score = match self.ats_score.trim() {
            "" => SCORE_NOT_AVAILABLE.to_string(),
            score => score.to_string(),
        };
        Self {
            ats_score,
            strengths: items_or_default(self.strengths, DEFAULT_STRENGTHS),
            weaknesses: items_or_default(self.weaknesses, DEFAULT_WEAKNESSES),
            suggestions: items_or_default(self.suggestions, DEFAULT_SUGGESTIONS),
        }
    }
}

/// Opening headings for one field plus every heading allowed to close it.
struct SectionMatcher {
    opening: Regex,
    closing: Option<Regex>,
}

impl SectionMatcher {
    fn new(titles: &[&str]) -> Self {
        let first_index = titles
            .iter()
            .filter_map(|t| SECTION_ORDER.iter().position(|s| s == t))
            .next()
            .unwrap_or(0);
        let later = &SECTION_ORDER[first_index + 1..];

        Self {
            opening: heading_regex(titles).expect("Invalid section heading regex"),
            closing: heading_regex(later),
        }
    }

    /// Returns the trimmed section body, or `""` when no heading matches.
    fn extract<'a>(&self, text: &'a str) -> &'a str {
        let Some(heading) = self.opening.find(text) else {
            return "";
        };
        let rest = &text[heading.end()..];
        let end = self
            .closing
            .as_ref()
            .and_then(|re| re.find(rest))
            .map(|m| m.start())
            .unwrap_or(rest.len());
        rest[..end].trim()
    }
}

fn heading_regex(titles: &[&str]) -> Option<Regex> {
    if titles.is_empty() {
        return None;
    }
    let alternatives = titles
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{alternatives})")).ok()
}

static STRENGTHS: LazyLock<SectionMatcher> = LazyLock::new(|| SectionMatcher::new(&["Strengths"]));
static WEAKNESSES: LazyLock<SectionMatcher> =
    LazyLock::new(|| SectionMatcher::new(&["Weaknesses", "Areas for Improvement"]));
static SUGGESTIONS: LazyLock<SectionMatcher> =
    LazyLock::new(|| SectionMatcher::new(&["Suggestions", "Recommendations"]));

/// Parses free-form analysis text. Missing pieces fall back to defaults.
pub fn parse_analysis_text(text: &str) -> AnalysisResult {
    AnalysisResult {
        ats_score: extract_score(text).unwrap_or_else(|| SCORE_NOT_AVAILABLE.to_string()),
        strengths: bullets_or_default(STRENGTHS.extract(text), DEFAULT_STRENGTHS),
        weaknesses: bullets_or_default(WEAKNESSES.extract(text), DEFAULT_WEAKNESSES),
        suggestions: bullets_or_default(SUGGESTIONS.extract(text), DEFAULT_SUGGESTIONS),
    }
}

/// Finds `<n>/100`, preferring the one that follows an "ATS Score" heading.
fn extract_score(text: &str) -> Option<String> {
    ATS_SCORE_REGEX
        .captures(text)
        .or_else(|| ANY_SCORE_REGEX.captures(text))
        .and_then(|c| c.get(1))
        .map(|m| format!("{}/100", m.as_str()))
}

fn extract_bullet_points(section: &str) -> Vec<String> {
    section
        .lines()
        .map(|line| {
            let line = LEADING_MARKUP_REGEX.replace(line.trim(), "");
            INLINE_MARKUP_REGEX.replace_all(&line, "").trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

fn bullets_or_default(section: &str, default: &str) -> Vec<String> {
    or_default(extract_bullet_points(section), default)
}

fn items_or_default(items: Vec<String>, default: &str) -> Vec<String> {
    let items = items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    or_default(items, default)
}

fn or_default(items: Vec<String>, default: &str) -> Vec<String> {
    if items.is_empty() {
        vec![default.to_string()]
    } else {
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESPONSE: &str = "\
**ATS Score**
72/100

**Strengths**
* **Skills:** Solid Rust and SQL background.
* **Experience:** Four years of backend work.

**Weaknesses**
* **Metrics:** Few quantified results.

**Suggestions**
* **Action Verbs:** Lead with stronger verbs.
";

    #[test]
    fn test_extracts_inline_ats_score() {
        let result = parse_analysis_text("ATS Score: 72/100\nStrengths\n* Good");
        assert_eq!(result.ats_score, "72/100");
    }

    #[test]
    fn test_extracts_score_on_following_line() {
        let result = parse_analysis_text(FULL_RESPONSE);
        assert_eq!(result.ats_score, "72/100");
    }

    #[test]
    fn test_missing_score_is_not_available() {
        let result = parse_analysis_text("Strengths\n* Clear layout");
        assert_eq!(result.ats_score, SCORE_NOT_AVAILABLE);
    }

    #[test]
    fn test_bare_fraction_is_used_without_heading() {
        let result = parse_analysis_text("Overall you scored 64/100 on our rubric.");
        assert_eq!(result.ats_score, "64/100");
    }

    #[test]
    fn test_strengths_stop_at_next_heading() {
        let result = parse_analysis_text(FULL_RESPONSE);
        assert_eq!(
            result.strengths,
            vec![
                "Skills: Solid Rust and SQL background.".to_string(),
                "Experience: Four years of backend work.".to_string(),
            ]
        );
        assert_eq!(result.weaknesses, vec!["Metrics: Few quantified results.".to_string()]);
        assert_eq!(
            result.suggestions,
            vec!["Action Verbs: Lead with stronger verbs.".to_string()]
        );
    }

    #[test]
    fn test_markup_only_section_falls_back_to_placeholder() {
        let text = "Strengths\n*  \n## \n   *\nWeaknesses\n* Thin summary";
        let result = parse_analysis_text(text);
        assert_eq!(result.strengths, vec![DEFAULT_STRENGTHS.to_string()]);
        assert_eq!(result.weaknesses, vec!["Thin summary".to_string()]);
    }

    #[test]
    fn test_areas_for_improvement_populates_weaknesses() {
        let text = "\
ATS Score: 80/100
Strengths
- Strong projects
Areas for Improvement
- Add a summary
Recommendations
- Use metrics";
        let result = parse_analysis_text(text);
        assert_eq!(result.weaknesses, vec!["Add a summary".to_string()]);
        assert_eq!(result.suggestions, vec!["Use metrics".to_string()]);
        assert_eq!(result.strengths, vec!["Strong projects".to_string()]);
    }

    #[test]
    fn test_headings_match_case_insensitively() {
        let text = "STRENGTHS\n* Concise\nweaknesses\n* Dense formatting";
        let result = parse_analysis_text(text);
        assert_eq!(result.strengths, vec!["Concise".to_string()]);
        assert_eq!(result.weaknesses, vec!["Dense formatting".to_string()]);
    }

    #[test]
    fn test_empty_input_returns_all_defaults() {
        assert_eq!(parse_analysis_text(""), AnalysisResult::default());
    }

    #[test]
    fn test_normalized_fills_empty_and_blank_lists() {
        let result = AnalysisResult {
            ats_score: "  ".to_string(),
            strengths: vec![],
            weaknesses: vec!["   ".to_string(), String::new()],
            suggestions: vec![" Quantify impact ".to_string(), "\t".to_string()],
        }
        .normalized();

        assert_eq!(result.ats_score, SCORE_NOT_AVAILABLE);
        assert_eq!(result.strengths, vec![DEFAULT_STRENGTHS.to_string()]);
        assert_eq!(result.weaknesses, vec![DEFAULT_WEAKNESSES.to_string()]);
        assert_eq!(result.suggestions, vec!["Quantify impact".to_string()]);
    }

    #[test]
    fn test_normalized_keeps_complete_result() {
        let parsed = parse_analysis_text(FULL_RESPONSE);
        assert_eq!(parsed.clone().normalized(), parsed);
    }

    #[test]
    fn test_last_section_runs_to_end_of_text() {
        let text = "Suggestions\n* One\n* Two\n* Three";
        let result = parse_analysis_text(text);
        assert_eq!(result.suggestions.len(), 3);
        assert_eq!(result.suggestions[2], "Three");
    }
}
