// Shared upload handling for applicant analysis and recruiter candidate uploads.
// Both flows validate through `validate_pdf`; only recruiter uploads are stored.

pub mod extract;

use std::collections::HashMap;
use std::sync::LazyLock;

use axum::extract::Multipart;
use bytes::Bytes;
use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

static UNSAFE_NAME_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w.\-]+").expect("Invalid file name regex"));

const FALLBACK_NAME: &str = "candidate";

#[derive(Debug, Error, PartialEq)]
pub enum UploadError {
    #[error("Please select a PDF file to upload.")]
    MissingFile,

    #[error("Only PDF files are supported.")]
    NotPdf,

    #[error("The uploaded file is empty.")]
    Empty,

    #[error("File size exceeds {}MB.", .limit_bytes / (1024 * 1024))]
    TooLarge { limit_bytes: usize },

    #[error("Please enter the applicant's name.")]
    BlankApplicantName,
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        AppError::Validation(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Text fields plus the (single) file part of a multipart form.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl MultipartForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn take_file(&mut self) -> Result<UploadedFile, UploadError> {
        self.file.take().ok_or(UploadError::MissingFile)
    }
}

/// Drains a multipart body. The part named `file_field` is kept as bytes;
/// every other part is read as text.
pub async fn read_multipart(
    multipart: &mut Multipart,
    file_field: &str,
) -> Result<MultipartForm, AppError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart data: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == file_field {
            let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file data: {e}")))?;
            form.file = Some(UploadedFile {
                file_name,
                content_type,
                bytes,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read field '{name}': {e}")))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// Accepts PDFs by content type or `.pdf` extension, non-empty and within the limit.
pub fn validate_pdf(file: &UploadedFile, max_bytes: usize) -> Result<(), UploadError> {
    let is_pdf_type = file
        .content_type
        .as_deref()
        .map(|ct| ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false);
    let has_pdf_extension = file.file_name.to_ascii_lowercase().ends_with(".pdf");

    if !is_pdf_type && !has_pdf_extension {
        return Err(UploadError::NotPdf);
    }
    if file.bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if file.bytes.len() > max_bytes {
        return Err(UploadError::TooLarge {
            limit_bytes: max_bytes,
        });
    }
    Ok(())
}

pub fn validate_applicant_name(name: Option<&str>) -> Result<String, UploadError> {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => Ok(n.to_string()),
        _ => Err(UploadError::BlankApplicantName),
    }
}

/// Folder holding every candidate file of one project.
pub fn project_prefix(recruiter_id: Uuid, project_id: Uuid) -> String {
    format!("recruiter/{recruiter_id}/{project_id}/")
}

/// `recruiter/<rid>/<pid>/<Applicant_Name>_<unix_millis>_<8 hex of upload_id>.pdf`
pub fn storage_key(
    recruiter_id: Uuid,
    project_id: Uuid,
    applicant_name: &str,
    unix_millis: i64,
    upload_id: Uuid,
) -> String {
    let upload_id = upload_id.simple().to_string();
    format!(
        "{}{}_{}_{}.pdf",
        project_prefix(recruiter_id, project_id),
        sanitize_name(applicant_name),
        unix_millis,
        &upload_id[..8]
    )
}

// Only letters, digits, `.`, `_` and `-` survive; path separators would
// escape the project folder.
fn sanitize_name(name: &str) -> String {
    let name = UNSAFE_NAME_RUN_REGEX.replace_all(name.trim(), "_");
    match name.trim_matches('_') {
        "" => FALLBACK_NAME.to_string(),
        name => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str, content_type: Option<&str>, len: usize) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: content_type.map(str::to_string),
            bytes: Bytes::from(vec![b'x'; len]),
        }
    }

    #[test]
    fn test_accepts_pdf_by_content_type() {
        let file = pdf("upload", Some("application/pdf"), 10);
        assert_eq!(validate_pdf(&file, 100), Ok(()));
    }

    #[test]
    fn test_accepts_pdf_by_extension() {
        let file = pdf("Resume.PDF", Some("application/octet-stream"), 10);
        assert_eq!(validate_pdf(&file, 100), Ok(()));
    }

    #[test]
    fn test_rejects_non_pdf() {
        let file = pdf("resume.docx", Some("application/msword"), 10);
        assert_eq!(validate_pdf(&file, 100), Err(UploadError::NotPdf));
        assert_eq!(UploadError::NotPdf.to_string(), "Only PDF files are supported.");
    }

    #[test]
    fn test_rejects_empty_file() {
        let file = pdf("resume.pdf", None, 0);
        assert_eq!(validate_pdf(&file, 100), Err(UploadError::Empty));
    }

    #[test]
    fn test_rejects_oversize_file() {
        let limit = 5 * 1024 * 1024;
        let file = pdf("resume.pdf", None, limit + 1);
        let err = validate_pdf(&file, limit).unwrap_err();
        assert_eq!(err.to_string(), "File size exceeds 5MB.");
    }

    #[test]
    fn test_file_at_exact_limit_is_accepted() {
        let file = pdf("resume.pdf", None, 64);
        assert_eq!(validate_pdf(&file, 64), Ok(()));
    }

    #[test]
    fn test_blank_applicant_name_is_rejected() {
        assert_eq!(
            validate_applicant_name(Some("   ")),
            Err(UploadError::BlankApplicantName)
        );
        assert_eq!(validate_applicant_name(None), Err(UploadError::BlankApplicantName));
        assert_eq!(validate_applicant_name(Some(" Ada ")), Ok("Ada".to_string()));
    }

    fn upload_id() -> Uuid {
        Uuid::parse_str("0123abcd-0000-4000-8000-000000000000").unwrap()
    }

    #[test]
    fn test_storage_key_replaces_whitespace_runs() {
        let rid = Uuid::nil();
        let pid = Uuid::nil();
        let key = storage_key(rid, pid, "Ada   Byron\tLovelace", 1_700_000_000_000, upload_id());
        assert_eq!(
            key,
            format!("recruiter/{rid}/{pid}/Ada_Byron_Lovelace_1700000000000_0123abcd.pdf")
        );
    }

    #[test]
    fn test_storage_key_stays_inside_project_folder() {
        let key = storage_key(Uuid::nil(), Uuid::nil(), "../evil/name", 1, upload_id());
        assert!(key.starts_with(&project_prefix(Uuid::nil(), Uuid::nil())));
        assert_eq!(key.matches('/').count(), 3);
    }

    #[test]
    fn test_storage_key_drops_url_special_characters() {
        let key = storage_key(Uuid::nil(), Uuid::nil(), "Ann #2 ?x 100%", 1, upload_id());
        assert!(key.ends_with("/Ann_2_x_100_1_0123abcd.pdf"), "{key}");
        assert!(!key.contains(['#', '?', '%']));
    }

    #[test]
    fn test_storage_key_keeps_non_ascii_letters() {
        let key = storage_key(Uuid::nil(), Uuid::nil(), "José Núñez", 1, upload_id());
        assert!(key.ends_with("/José_Núñez_1_0123abcd.pdf"), "{key}");
    }

    #[test]
    fn test_symbol_only_name_uses_fallback() {
        let key = storage_key(Uuid::nil(), Uuid::nil(), "###", 1, upload_id());
        assert!(key.ends_with("/candidate_1_0123abcd.pdf"), "{key}");
    }

    #[test]
    fn test_same_millisecond_uploads_get_distinct_keys() {
        let a = storage_key(Uuid::nil(), Uuid::nil(), "Ada", 1, Uuid::new_v4());
        let b = storage_key(Uuid::nil(), Uuid::nil(), "Ada", 1, Uuid::new_v4());
        assert_ne!(a, b);
    }
}
