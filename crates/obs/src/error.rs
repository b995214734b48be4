//! CLI error types.

use obs_pipeline::PipelineError;
use obs_source::SourceError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Server(String),
}
