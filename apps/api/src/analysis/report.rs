use crate::analysis::scorer::{InvalidDocument, ResumeScore};

/// Builds the `**ATS Score** / **Strengths** / **Weaknesses** / **Suggestions**` report.
pub fn build_analysis_text(outcome: &Result<ResumeScore, InvalidDocument>) -> String {
    match outcome {
        Ok(score) => scored_report(score),
        Err(invalid) => invalid_report(invalid),
    }
}

fn invalid_report(invalid: &InvalidDocument) -> String {
    format!(
        "**ATS Score**\n0/100\n\n\
         **Strengths**\n* **N/A**\n\n\
         **Weaknesses**\n* **Invalid Document:** {}\n\n\
         **Suggestions**\n* **Re-upload:** Please upload a valid professional resume (PDF) to proceed.\n",
        invalid.message
    )
}

fn scored_report(score: &ResumeScore) -> String {
    let mut strengths = Vec::new();
    if score.breakdown.structure == 20 {
        strengths.push(
            "* **Structure:** Resume follows a complete and professional structure with all key sections present."
                .to_string(),
        );
    }
    if score.impact_count >= 3 {
        strengths.push(format!(
            "* **Impact:** Good use of quantifiable metrics (found {} instances) to demonstrate achievements.",
            score.impact_count
        ));
    }
    if !score.matched_keywords.is_empty() {
        let top = score
            .matched_keywords
            .iter()
            .take(5)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        strengths.push(format!(
            "* **Relevance:** Strong alignment with job keywords: {top}."
        ));
    }
    if strengths.is_empty() {
        strengths.push(
            "* **Content:** Resume has sufficient length and detail for analysis.".to_string(),
        );
    }

    let mut weaknesses = Vec::new();
    if !score.missing_sections.is_empty() {
        weaknesses.push(format!(
            "* **Missing Sections:** Critical sections appear to be missing or mislabeled: {}.",
            score.missing_sections.join(", ")
        ));
    }
    if score.impact_count < 2 {
        weaknesses.push(
            "* **Quantifiable Results:** Lacks specific metrics (%, $) to prove impact. Use numbers to tell your story."
                .to_string(),
        );
    }
    if !score.missing_keywords.is_empty() {
        weaknesses.push(format!(
            "* **Keywords:** Missing important keywords for this role: {}.",
            score.missing_keywords.join(", ")
        ));
    }

    let mut suggestions = vec![
        "* **Action Verbs:** Ensure every bullet point starts with a strong action verb (e.g., 'Lead', 'Developed')."
            .to_string(),
    ];
    if score.impact_count < 3 {
        suggestions.push(
            "* **Add Metrics:** Try to rewrite one bullet point per role using the 'X-Y-Z' formula: 'Accomplished [X] as measured by [Y], by doing [Z]'."
                .to_string(),
        );
    }
    if !score.missing_sections.is_empty() {
        suggestions.push(
            "* **Reorganize:** Add clear headers for the missing sections identified above."
                .to_string(),
        );
    }

    format!(
        "**ATS Score**\n{}/100\n\n**Strengths**\n{}\n\n**Weaknesses**\n{}\n\n**Suggestions**\n{}\n",
        score.final_score,
        strengths.join("\n"),
        weaknesses.join("\n"),
        suggestions.join("\n"),
    )
}
