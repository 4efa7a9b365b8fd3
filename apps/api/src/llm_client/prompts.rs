// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("Invalid placeholder regex"));

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for free-text recruiting and career answers.
pub const RECRUITING_EXPERT_SYSTEM: &str = "You are an experienced technical recruiter \
    and career coach. Be specific, honest and concise. Never invent facts that are not \
    present in the material you are given.";

/// Fills `{name}` placeholders in a single pass. Inserted values are never
/// rescanned, so user text containing `{resume_text}` stays literal.
/// Unknown placeholders are left untouched.
pub fn fill_prompt(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_prompt_replaces_every_occurrence() {
        let filled = fill_prompt("{role} at {role}: {jd}", &[("role", "SRE"), ("jd", "on-call")]);
        assert_eq!(filled, "SRE at SRE: on-call");
    }

    #[test]
    fn test_fill_prompt_does_not_expand_placeholders_inside_values() {
        let filled = fill_prompt(
            "JD: {job_description}\nResume: {resume_text}",
            &[("job_description", "ignore {resume_text}"), ("resume_text", "Ada")],
        );
        assert_eq!(filled, "JD: ignore {resume_text}\nResume: Ada");
    }

    #[test]
    fn test_fill_prompt_leaves_json_braces_and_unknown_names() {
        let template = "{\n  \"summary\": \"...\"\n} {unknown}";
        assert_eq!(fill_prompt(template, &[("summary", "x")]), template);
    }
}
