//! `obs generate` command implementation.

use std::path::PathBuf;

use clap::Args;

use obs_pipeline::{PdfRequest, PipelineConfig};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
#[command(group(
    clap::ArgGroup::new("source").required(true).args(["lang_code", "repo"])
))]
pub(crate) struct GenerateArgs {
    /// Door43 catalog language code (e.g. en, es-419).
    #[arg(long)]
    lang_code: Option<String>,

    /// Door43 repository as user/name.
    #[arg(long)]
    repo: Option<String>,

    /// Branch or tag to build (with --repo).
    #[arg(long = "ref", requires = "repo", conflicts_with = "lang_code")]
    reference: Option<String>,

    /// Only typeset the first N chapters (0 = all).
    #[arg(long, default_value_t = 0)]
    max_chapters: usize,

    /// Illustration resolution directory.
    #[arg(long, default_value = "360px")]
    img_res: String,

    /// Upload bucket.
    #[arg(long, default_value = "cdn.door43.org")]
    bucket: String,

    /// Custom S3 endpoint (MinIO, LocalStack).
    #[arg(long)]
    endpoint: Option<String>,

    /// AWS region of the bucket.
    #[arg(long, default_value = "us-west-2")]
    region: String,

    /// Override the CDN folder derived from the request.
    #[arg(long)]
    cdn_folder: Option<String>,

    /// Keep the tex, logs and PDF here instead of a scratch directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// On-disk typesetting resources overriding the embedded ones.
    #[arg(long)]
    snippet_dir: Option<PathBuf>,

    /// Produce the PDF but do not upload it.
    #[arg(long)]
    skip_upload: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl GenerateArgs {
    /// Execute the generate command.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let request = self.request()?;
        output.info(&format!(
            "Starting OBS PDF processing for {}",
            request.description()
        ));

        let config = PipelineConfig {
            bucket: self.bucket,
            region: self.region,
            endpoint: self.endpoint,
            cdn_folder: self.cdn_folder,
            max_chapters: self.max_chapters,
            image_resolution: self.img_res,
            output_dir: self.output_dir,
            snippet_dir: self.snippet_dir,
            token_overrides: std::collections::BTreeMap::new(),
            skip_upload: self.skip_upload,
        };

        let result = obs_pipeline::run(&request, &config).await?;
        output.success("PDF generation finished");
        output.highlight(&result);
        Ok(())
    }

    fn request(&self) -> Result<PdfRequest, CliError> {
        if let Some(code) = &self.lang_code {
            return Ok(PdfRequest::LangCode(code.clone()));
        }
        let spec = self.repo.as_deref().unwrap_or_default();
        let request = PdfRequest::from_repo_spec(spec)?;
        match (&self.reference, request) {
            (Some(reference), PdfRequest::Repo { user, repo }) => Ok(PdfRequest::RepoRef {
                user,
                repo,
                reference: reference.clone(),
            }),
            (_, request) => Ok(request),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: GenerateArgs,
    }

    fn parse(argv: &[&str]) -> GenerateArgs {
        Harness::try_parse_from([&["obs-generate"], argv].concat())
            .unwrap()
            .args
    }

    #[test]
    fn lang_code_builds_a_catalog_request() {
        let args = parse(&["--lang-code", "en"]);
        assert_eq!(
            args.request().unwrap(),
            PdfRequest::LangCode("en".to_owned())
        );
    }

    #[test]
    fn repo_with_ref_builds_a_pinned_request() {
        let args = parse(&["--repo", "unfoldingword/en_obs", "--ref", "v4"]);
        assert_eq!(
            args.request().unwrap(),
            PdfRequest::RepoRef {
                user: "unfoldingword".to_owned(),
                repo: "en_obs".to_owned(),
                reference: "v4".to_owned(),
            }
        );
    }

    #[test]
    fn source_argument_is_required() {
        assert!(Harness::try_parse_from(["obs-generate"]).is_err());
        assert!(Harness::try_parse_from(["obs-generate", "--lang-code", "en", "--repo", "a/b"]).is_err());
    }

    #[test]
    fn ref_requires_repo() {
        assert!(Harness::try_parse_from(["obs-generate", "--lang-code", "en", "--ref", "v4"]).is_err());
    }
}
