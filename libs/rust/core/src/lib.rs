//! Core shared utilities for HealthIQ services.
//!
//! Everything a service needs around its domain logic lives here: tracing
//! setup, layered configuration, the serving lifecycle flag, Prometheus
//! metrics and the liveness/readiness/metrics routes.

use anyhow::Result;
use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use once_cell::sync::OnceCell;
use prometheus::{Encoder, TextEncoder};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod config;
pub mod lifecycle;
pub mod metrics;

pub use config::{load_config, ConfigSources, CONFIG_FILE_ENV, ENV_PREFIX};
pub use lifecycle::{is_ready, mark_ready, serving_phase, ServingPhase};
pub use metrics::{Outcome, PredictionMetrics, PREDICTION_METRICS};

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Env var switching the fmt layer to JSON lines.
pub const JSON_LOG_ENV: &str = "HEALTHIQ_JSON_LOG";

/// Install the global subscriber. Safe to call more than once.
pub fn init_tracing(service: &str) -> Result<()> {
    TRACING_INIT.get_or_try_init(|| -> Result<()> {
        let json = std::env::var(JSON_LOG_ENV)
            .ok()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(env_filter);
        if json {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_current_span(true)
                        .with_span_list(false),
                )
                .try_init()?;
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_line_number(true),
                )
                .try_init()?;
        }
        Ok(())
    })?;
    info!(target: "healthiq", service, "tracing initialized");
    Ok(())
}

/// `/live`, `/ready` and `/metrics`, mergeable into any service router.
pub fn health_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/live", get(live))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics_handler))
}

async fn live() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "live": true }))
}

async fn ready() -> impl IntoResponse {
    let phase = serving_phase();
    let status = if phase == ServingPhase::Ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status, Json(serde_json::json!({ "ready": phase == ServingPhase::Ready, "phase": phase })))
}

async fn metrics_handler() -> impl IntoResponse {
    let families = prometheus::gather();
    let mut buf = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&families, &mut buf) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            format!("encode error: {e}").into_bytes(),
        );
    }
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], buf)
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = ?e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let term = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = ?e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let term = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = term => {},
    }
    info!(target: "healthiq", "shutdown signal received");
}
