//! HTTP trigger surface for OBS PDF generation.
//!
//! Two routes:
//!
//! - `GET /?lang_code=…` or `GET /?repo=user/name` starts a pipeline
//!   run for a catalog language or a repository
//! - `POST /webhook` accepts the forge's JSON payload and builds the
//!   named repository at its branch or tag
//!
//! A run can take minutes; the response is held open until the PDF is
//! uploaded and then carries the public URL.

mod app;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use obs_pipeline::PipelineConfig;
use state::AppState;

/// Server configuration.
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Settings applied to triggered pipeline runs.
    pub pipeline: PipelineConfig,
}

/// Run the server until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        pipeline: config.pipeline,
    });
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received, stopping server...");
}
