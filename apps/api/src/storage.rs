use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use reqwest::Url;
use tracing::info;

use crate::errors::AppError;

pub async fn put_pdf(s3: &S3Client, bucket: &str, key: &str, body: Bytes) -> Result<(), AppError> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;
    Ok(())
}

pub async fn get_object(s3: &S3Client, bucket: &str, key: &str) -> Result<Bytes, AppError> {
    let output = s3
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("download of {key} failed: {e}")))?;

    let data = output
        .body
        .collect()
        .await
        .map_err(|e| AppError::S3(format!("reading {key} failed: {e}")))?;
    Ok(data.into_bytes())
}

pub async fn delete_object(s3: &S3Client, bucket: &str, key: &str) -> Result<(), AppError> {
    s3.delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("delete of {key} failed: {e}")))?;
    Ok(())
}

/// Deletes every object under `prefix`, page by page. Returns the number removed.
pub async fn delete_prefix(s3: &S3Client, bucket: &str, prefix: &str) -> Result<usize, AppError> {
    let mut removed = 0;
    let mut continuation: Option<String> = None;

    loop {
        let page = s3
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .set_continuation_token(continuation.take())
            .send()
            .await
            .map_err(|e| AppError::S3(format!("listing {prefix} failed: {e}")))?;

        let identifiers = page
            .contents()
            .iter()
            .filter_map(|obj| obj.key())
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::S3(format!("invalid object key under {prefix}: {e}")))?;

        if !identifiers.is_empty() {
            let count = identifiers.len();
            let delete = Delete::builder()
                .set_objects(Some(identifiers))
                .quiet(true)
                .build()
                .map_err(|e| AppError::S3(format!("building delete request failed: {e}")))?;
            s3.delete_objects()
                .bucket(bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| AppError::S3(format!("bulk delete under {prefix} failed: {e}")))?;
            removed += count;
        }

        match page.next_continuation_token() {
            Some(token) if page.is_truncated().unwrap_or(false) => {
                continuation = Some(token.to_string());
            }
            _ => break,
        }
    }

    info!("Removed {removed} object(s) under {prefix}");
    Ok(removed)
}

/// Public path-style URL for a stored object. Each key segment is percent-encoded.
pub fn download_url(public_base_url: &str, bucket: &str, key: &str) -> Result<String, AppError> {
    let mut url = Url::parse(public_base_url).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Invalid public base URL {public_base_url}: {e}"))
    })?;
    url.path_segments_mut()
        .map_err(|_| {
            AppError::Internal(anyhow::anyhow!("Public base URL cannot take a path: {public_base_url}"))
        })?
        .pop_if_empty()
        .push(bucket)
        .extend(key.split('/'));
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url_trims_trailing_slash() {
        assert_eq!(
            download_url("http://localhost:9000/", "mitra", "recruiter/a/b/c.pdf").unwrap(),
            "http://localhost:9000/mitra/recruiter/a/b/c.pdf"
        );
    }

    #[test]
    fn test_download_url_encodes_special_characters() {
        let url = download_url("http://localhost:9000", "mitra", "recruiter/a/b/Ann #2 ?x 100%.pdf")
            .unwrap();
        assert_eq!(
            url,
            "http://localhost:9000/mitra/recruiter/a/b/Ann%20%232%20%3Fx%20100%25.pdf"
        );

        let parsed = Url::parse(&url).unwrap();
        assert!(parsed.fragment().is_none());
        assert!(parsed.query().is_none());
        assert_eq!(
            parsed.path_segments().unwrap().last(),
            Some("Ann%20%232%20%3Fx%20100%25.pdf")
        );
    }

    #[test]
    fn test_download_url_keeps_base_path() {
        assert_eq!(
            download_url("https://cdn.example.com/files", "mitra", "k.pdf").unwrap(),
            "https://cdn.example.com/files/mitra/k.pdf"
        );
    }

    #[test]
    fn test_download_url_rejects_invalid_base() {
        assert!(download_url("not a url", "mitra", "k.pdf").is_err());
    }
}
