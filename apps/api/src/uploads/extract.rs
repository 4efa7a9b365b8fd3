use bytes::Bytes;
use tracing::warn;

use crate::errors::AppError;

const UNREADABLE_PDF: &str = "Could not extract text from the PDF file.";

/// Extracts plain text from PDF bytes.
///
/// The extractor is CPU-bound and can panic on malformed files, so it runs on
/// the blocking pool. Both a returned error and a panic become a validation error.
pub async fn extract_pdf_text(bytes: Bytes) -> Result<String, AppError> {
    let outcome =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;

    match outcome {
        Ok(Ok(text)) => Ok(text.trim().to_string()),
        Ok(Err(e)) => {
            warn!("PDF text extraction failed: {e}");
            Err(AppError::Validation(UNREADABLE_PDF.to_string()))
        }
        Err(e) if e.is_panic() => {
            warn!("PDF text extraction panicked on malformed input");
            Err(AppError::Validation(UNREADABLE_PDF.to_string()))
        }
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "spawn_blocking failed in PDF extraction: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_bytes_are_a_validation_error() {
        let err = extract_pdf_text(Bytes::from_static(b"definitely not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
