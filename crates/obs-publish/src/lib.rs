//! S3 publishing of finished PDFs.
//!
//! One artifact per run: the generated PDF goes to
//! `s3://<bucket>/<folder>/<name>.pdf` and the public `https` URL is
//! handed back for the caller to report.

use std::error::Error;
use std::path::{Path, PathBuf};

use aws_sdk_s3::Client;

/// Configuration for PDF publishing.
pub struct PublishConfig {
    /// Target bucket, e.g. `cdn.door43.org` (or `dev-cdn.door43.org`).
    pub bucket: String,
    /// Key prefix inside the bucket.
    pub folder: String,
    /// S3-compatible endpoint URL.
    pub endpoint: Option<String>,
    /// AWS region.
    pub region: String,
}

/// Error returned by the publisher.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("S3 error: {0}")]
    S3(String),
    #[error("PDF not found: {0}")]
    FileNotFound(PathBuf),
}

/// Publishes one PDF file to S3.
pub struct PdfPublisher {
    config: PublishConfig,
}

impl PdfPublisher {
    #[must_use]
    pub fn new(config: PublishConfig) -> Self {
        Self { config }
    }

    /// Upload `pdf_path` under `name` (without extension).
    ///
    /// Returns the public URL of the uploaded object.
    pub async fn publish(&self, pdf_path: &Path, name: &str) -> Result<String, PublishError> {
        if !pdf_path.is_file() {
            return Err(PublishError::FileNotFound(pdf_path.to_path_buf()));
        }

        let key = self.build_key(name);
        let body = std::fs::read(pdf_path)?;
        tracing::info!(bucket = %self.config.bucket, key = %key, "uploading PDF");

        let client = self.build_client().await;
        client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .body(body.into())
            .content_type("application/pdf")
            .send()
            .await
            .map_err(|e| PublishError::S3(error_chain(&e)))?;

        Ok(format!("https://{}/{key}", self.config.bucket))
    }

    async fn build_client(&self) -> Client {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(self.config.region.clone()));

        if let Some(endpoint) = &self.config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        // Custom endpoints (LocalStack, MinIO) require path-style
        // addressing (endpoint/bucket/key) instead of the default
        // virtual-hosted-style (bucket.endpoint/key).
        if self.config.endpoint.is_some() {
            let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                .force_path_style(true)
                .build();
            return Client::from_conf(s3_config);
        }

        Client::new(&sdk_config)
    }

    fn build_key(&self, name: &str) -> String {
        format!("{}/{name}.pdf", self.config.folder.trim_matches('/'))
    }
}

/// Walk the error source chain and join all messages.
fn error_chain(err: &dyn Error) -> String {
    let mut msgs = vec![err.to_string()];
    let mut source = err.source();
    while let Some(s) = source {
        msgs.push(s.to_string());
        source = s.source();
    }
    msgs.join(": ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn publisher(folder: &str) -> PdfPublisher {
        PdfPublisher::new(PublishConfig {
            bucket: "cdn.door43.org".to_owned(),
            folder: folder.to_owned(),
            endpoint: None,
            region: "us-west-2".to_owned(),
        })
    }

    #[test]
    fn keys_are_folder_slash_name_pdf() {
        assert_eq!(
            publisher("obs/auto_PDFs").build_key("en"),
            "obs/auto_PDFs/en.pdf"
        );
        assert_eq!(
            publisher("u/user/repo/master").build_key("user--repo--master"),
            "u/user/repo/master/user--repo--master.pdf"
        );
    }

    #[test]
    fn folder_slashes_are_normalized() {
        assert_eq!(publisher("/obs/auto_PDFs/").build_key("en"), "obs/auto_PDFs/en.pdf");
    }

    #[tokio::test]
    async fn missing_file_is_reported_before_any_upload() {
        let err = publisher("obs/auto_PDFs")
            .publish(Path::new("/nonexistent/en.pdf"), "en")
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::FileNotFound(_)));
    }
}
