//! HealthIQ risk engine: diabetes risk scoring behind a small HTTP surface.
//!
//! Startup order is fixed: configuration, then the model artifact, then
//! READY, then the listener. A failure anywhere before the bind leaves the
//! process UNINITIALIZED and `run` returns the error.

use anyhow::Result;
use axum::Router;
use healthiq_core::{init_tracing, mark_ready, shutdown_signal, PREDICTION_METRICS};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

pub mod artifact;
pub mod config;
pub mod error;
pub mod indicators;
pub mod inference;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod validate;

pub use artifact::{load, LoadOptions, ModelArtifact, Scorer};
pub use config::{ServiceConfig, SERVICE_NAME};
pub use error::{InferenceError, PredictError, StartupError, ValidationError, ValidationErrors};
pub use indicators::HealthIndicators;
pub use inference::{infer, FeatureVector};
pub use response::{build, PredictionResult};
pub use schema::FeatureSchema;
pub use service::PredictionService;
pub use validate::validate;

/// Router over an already loaded artifact.
pub fn app(artifact: Arc<ModelArtifact>) -> Router {
    routes::router(PredictionService::new(artifact))
}

/// Load the artifact, mark READY and bind. Nothing listens unless the
/// artifact loaded.
pub async fn bootstrap(cfg: &ServiceConfig) -> Result<(TcpListener, Router)> {
    let artifact = artifact::load(&cfg.load_options()).map_err(|e| {
        error!(error = %e, path = %cfg.artifact_path.display(), "startup failed; refusing traffic");
        e
    })?;
    PREDICTION_METRICS.set_model(artifact.version(), artifact.scorer().kind());
    let router = app(Arc::new(artifact));
    mark_ready();
    let listener = TcpListener::bind(cfg.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    Ok((listener, router))
}

pub async fn run() -> Result<()> {
    init_tracing(SERVICE_NAME)?;
    let cfg = ServiceConfig::load()?;
    info!(?cfg, "config loaded");
    let (listener, router) = bootstrap(&cfg).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
    info!("shutdown");
    Ok(())
}
