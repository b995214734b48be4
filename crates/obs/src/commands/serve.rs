//! `obs serve` command implementation.

use std::path::PathBuf;

use clap::Args;

use obs_pipeline::PipelineConfig;
use obs_server::{ServerConfig, run_server};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Host to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Upload bucket for triggered runs.
    #[arg(long, default_value = "cdn.door43.org")]
    bucket: String,

    /// Custom S3 endpoint (MinIO, LocalStack).
    #[arg(long)]
    endpoint: Option<String>,

    /// AWS region of the bucket.
    #[arg(long, default_value = "us-west-2")]
    region: String,

    /// On-disk typesetting resources overriding the embedded ones.
    #[arg(long)]
    snippet_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        output.info(&format!("Starting server on {}:{}", self.host, self.port));

        let config = ServerConfig {
            host: self.host,
            port: self.port,
            pipeline: PipelineConfig {
                bucket: self.bucket,
                region: self.region,
                endpoint: self.endpoint,
                snippet_dir: self.snippet_dir,
                ..PipelineConfig::default()
            },
        };

        run_server(config)
            .await
            .map_err(|err| CliError::Server(err.to_string()))
    }
}
