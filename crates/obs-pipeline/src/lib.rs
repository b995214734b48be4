//! End-to-end PDF pipeline.
//!
//! One run takes a [`PdfRequest`], resolves and downloads the book
//! source, validates it, renders the typesetting document, hands it to
//! the ConTeXt engine and uploads the resulting PDF. The public URL of
//! the upload is the result.

mod request;

use std::collections::BTreeMap;
use std::path::PathBuf;

use obs_context::{ContextEngine, EngineError, ensure_language_font};
use obs_publish::{PdfPublisher, PublishConfig, PublishError};
use obs_source::{SourceError, SourceWorkspace, fetch_catalog, find_zip_url, http_agent, load_book};
use obs_typeset::{Assembler, RenderConfig, SnippetSet, TypesetError};

pub use request::PdfRequest;

/// Settings for one pipeline run.
pub struct PipelineConfig {
    /// Upload bucket.
    pub bucket: String,
    /// AWS region of the bucket.
    pub region: String,
    /// Custom S3 endpoint (testing against MinIO or LocalStack).
    pub endpoint: Option<String>,
    /// Override the CDN folder derived from the request.
    pub cdn_folder: Option<String>,
    /// Limit the number of typeset chapters; 0 keeps all fifty.
    pub max_chapters: usize,
    /// Illustration resolution directory.
    pub image_resolution: String,
    /// Directory for the generated tex, logs and PDF. Defaults to a
    /// scratch directory inside the download workspace.
    pub output_dir: Option<PathBuf>,
    /// On-disk typesetting resources overriding the embedded ones.
    pub snippet_dir: Option<PathBuf>,
    /// Extra render configuration tokens.
    pub token_overrides: BTreeMap<String, String>,
    /// Stop after the PDF is produced and return its local path.
    pub skip_upload: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bucket: "cdn.door43.org".to_owned(),
            region: "us-west-2".to_owned(),
            endpoint: None,
            cdn_folder: None,
            max_chapters: 0,
            image_resolution: "360px".to_owned(),
            output_dir: None,
            snippet_dir: None,
            token_overrides: BTreeMap::new(),
            skip_upload: false,
        }
    }
}

/// Error from a pipeline run.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PipelineError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// The book failed the quality check; every collected message is
    /// part of the error.
    #[error("quality check did not pass:\n{}", .errors.join("\n"))]
    Validation { errors: Vec<String> },

    #[error("typesetting error: {0}")]
    Typeset(#[from] TypesetError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

/// Run the whole pipeline for one request.
pub async fn run(request: &PdfRequest, config: &PipelineConfig) -> Result<String, PipelineError> {
    tracing::info!(description = %request.description(), "starting PDF processing");
    let agent = http_agent();

    let zip_url = match request.archive_url() {
        Some(url) => url,
        None => {
            let catalog = fetch_catalog(&agent)?;
            let PdfRequest::LangCode(code) = request else {
                unreachable!("only catalog requests lack an archive URL");
            };
            find_zip_url(&catalog, code)?
        }
    };

    let workspace = SourceWorkspace::fetch(&agent, &zip_url, &request.source_dir_name())?;
    let book = load_book(workspace.source_dir(), &request.description())?;

    tracing::info!("verifying the chapter data");
    let errors = obs_model::validate(&book.chapters);
    if !errors.is_empty() {
        return Err(PipelineError::Validation { errors });
    }

    let out_dir = config
        .output_dir
        .clone()
        .unwrap_or_else(|| workspace.root_dir().join("make_pdf"));
    std::fs::create_dir_all(&out_dir)?;

    let snippets = match &config.snippet_dir {
        Some(dir) => {
            ensure_language_font(dir, &book.language_id)?;
            SnippetSet::from_dir(dir)?
        }
        None => SnippetSet::embedded(),
    };

    let render_config = RenderConfig::for_book(&book, config.token_overrides.clone());
    let tex = Assembler::new(&book, &snippets, render_config)
        .max_chapters(config.max_chapters)
        .image_resolution(config.image_resolution.clone())
        .assemble()?;

    let tex_path = out_dir.join(format!("{}.tex", book.language_id));
    tracing::info!(path = %tex_path.display(), "writing the typesetting document");
    std::fs::write(&tex_path, tex)?;

    let pdf_path = ContextEngine::new().render(&tex_path, &out_dir)?;
    if config.skip_upload {
        tracing::info!(path = %pdf_path.display(), "skipping upload");
        return Ok(pdf_path.display().to_string());
    }

    let publisher = PdfPublisher::new(PublishConfig {
        bucket: config.bucket.clone(),
        folder: config
            .cdn_folder
            .clone()
            .unwrap_or_else(|| request.cdn_folder()),
        endpoint: config.endpoint.clone(),
        region: config.region.clone(),
    });
    let url = publisher.publish(&pdf_path, &request.filename_bit()).await?;
    tracing::info!(%url, "PDF uploaded");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn validation_error_carries_every_message() {
        let err = PipelineError::Validation {
            errors: vec![
                "Frame not found: 07-03".to_owned(),
                "Ref not found: 12".to_owned(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "quality check did not pass:\nFrame not found: 07-03\nRef not found: 12"
        );
    }
}
