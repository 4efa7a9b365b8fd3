//! Downloadable PDF report for an `AnalysisResult`.
//!
//! Layout is computed first (lines placed on A4 pages with word wrapping),
//! then written as a plain Type1-font PDF with `lopdf`. Text is limited to
//! the WinAnsi-safe ASCII range; other characters are transliterated or dropped.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;

use crate::analysis::parser::AnalysisResult;

pub const REPORT_FILE_NAME: &str = "Resume_Analysis_Report.pdf";
const REPORT_TITLE: &str = "Mitra AI Resume Analysis Report";

// A4 in points
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const FOOTER_Y: i64 = 30;
const BODY_FONT_SIZE: i64 = 11;
const LINE_HEIGHT: i64 = 15;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF encoding failed: {0}")]
    Encode(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PlacedLine {
    text: String,
    font: Font,
    size: i64,
    x: i64,
    y: i64,
}

/// Lines placed top-to-bottom, breaking onto a new page at the bottom margin.
struct Layout {
    pages: Vec<Vec<PlacedLine>>,
    cursor_y: i64,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor_y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn push(&mut self, text: &str, font: Font, size: i64, advance: i64) {
        if self.cursor_y - advance < MARGIN + FOOTER_Y {
            self.pages.push(Vec::new());
            self.cursor_y = PAGE_HEIGHT - MARGIN;
        }
        self.cursor_y -= advance;
        if let Some(page) = self.pages.last_mut() {
            page.push(PlacedLine {
                text: sanitize(text),
                font,
                size,
                x: MARGIN,
                y: self.cursor_y,
            });
        }
    }

    fn gap(&mut self, points: i64) {
        self.cursor_y -= points;
    }

    fn section(&mut self, title: &str, items: &[String]) {
        self.gap(10);
        self.push(title, Font::Bold, 16, 22);
        let max_chars = chars_per_line(BODY_FONT_SIZE);
        for item in items {
            for (i, line) in wrap_text(item, max_chars - 2).iter().enumerate() {
                let prefix = if i == 0 { "- " } else { "  " };
                self.push(&format!("{prefix}{line}"), Font::Regular, BODY_FONT_SIZE, LINE_HEIGHT);
            }
        }
    }
}

/// Renders the report and returns the PDF bytes. Empty or blank fields are
/// printed as their placeholders.
pub fn render_report(result: &AnalysisResult) -> Result<Vec<u8>, PdfError> {
    let result = result.clone().normalized();
    let mut layout = Layout::new();
    layout.push(REPORT_TITLE, Font::Bold, 22, 24);
    layout.gap(16);
    layout.push("ATS Score", Font::Bold, 18, 22);
    layout.push(&result.ats_score, Font::Bold, 28, 34);
    layout.section("Strengths", &result.strengths);
    layout.section("Areas for Improvement", &result.weaknesses);
    layout.section("Recommendations", &result.suggestions);

    write_pdf(&layout.pages)
}

fn write_pdf(pages: &[Vec<PlacedLine>]) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let total = pages.len();
    let mut kids: Vec<Object> = Vec::with_capacity(total);

    for (index, lines) in pages.iter().enumerate() {
        let mut operations = Vec::new();
        for line in lines {
            push_text(&mut operations, line);
        }
        push_text(
            &mut operations,
            &PlacedLine {
                text: format!("Page {} of {}", index + 1, total),
                font: Font::Regular,
                size: 9,
                x: PAGE_WIDTH / 2 - 25,
                y: FOOTER_Y,
            },
        );

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => total as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn push_text(operations: &mut Vec<Operation>, line: &PlacedLine) {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new(
        "Tf",
        vec![line.font.resource_name().into(), line.size.into()],
    ));
    operations.push(Operation::new("Td", vec![line.x.into(), line.y.into()]));
    operations.push(Operation::new(
        "Tj",
        vec![Object::string_literal(line.text.as_str())],
    ));
    operations.push(Operation::new("ET", vec![]));
}

/// Helvetica averages roughly half an em per character.
fn chars_per_line(font_size: i64) -> usize {
    let usable = (PAGE_WIDTH - 2 * MARGIN) as f64;
    (usable / (font_size as f64 * 0.5)).floor() as usize
}

/// Greedy word wrap; words longer than a line are hard-split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '•' | '–' | '—' => Some('-'),
            '‘' | '’' => Some('\''),
            '“' | '”' => Some('"'),
            c if c.is_ascii() && !c.is_ascii_control() => Some(c),
            c if c.is_whitespace() => Some(' '),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            ats_score: "81/100".to_string(),
            strengths: vec!["Clear structure".to_string()],
            weaknesses: vec!["Few metrics".to_string()],
            suggestions: vec!["Quantify impact".to_string()],
        }
    }

    #[test]
    fn test_render_report_produces_pdf_header() {
        let bytes = render_report(&sample_result()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn test_render_report_is_loadable_with_one_page() {
        let bytes = render_report(&sample_result()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    fn first_page_text(bytes: &[u8]) -> String {
        let doc = Document::load_mem(bytes).unwrap();
        doc.extract_text(&[1]).unwrap()
    }

    #[test]
    fn test_report_text_includes_score_and_headings() {
        let text = first_page_text(&render_report(&sample_result()).unwrap());
        for expected in [
            REPORT_TITLE,
            "ATS Score",
            "81/100",
            "Strengths",
            "Areas for Improvement",
            "Recommendations",
            "Clear structure",
            "Page 1 of 1",
        ] {
            assert!(text.contains(expected), "missing {expected:?} in {text:?}");
        }
    }

    #[test]
    fn test_empty_sections_render_placeholders() {
        let result = AnalysisResult {
            ats_score: "50/100".to_string(),
            strengths: vec![],
            weaknesses: vec!["   ".to_string()],
            suggestions: vec!["Quantify impact".to_string()],
        };
        let text = first_page_text(&render_report(&result).unwrap());
        assert!(text.contains("specific strengths"), "{text:?}");
        assert!(text.contains("specific areas for"), "{text:?}");
        assert!(text.contains("Quantify impact"));
    }

    #[test]
    fn test_long_report_spills_onto_more_pages() {
        let mut result = sample_result();
        result.strengths = (0..120).map(|i| format!("Strength number {i}")).collect();
        let bytes = render_report(&result).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let lines = wrap_text("alpha beta gamma delta epsilon", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta", "epsilon"]);
    }

    #[test]
    fn test_wrap_text_hard_splits_long_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_sanitize_transliterates_typography() {
        assert_eq!(sanitize("• It’s “done”"), "- It's \"done\"");
    }
}
