//! Shared server state.

use obs_pipeline::PipelineConfig;

/// State shared across request handlers.
pub(crate) struct AppState {
    /// Settings applied to every triggered pipeline run.
    pub pipeline: PipelineConfig,
}
