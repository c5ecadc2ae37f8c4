//! HTTP transport. Deserializes requests, hands them to
//! [`PredictionService`], serializes results and maps errors to statuses:
//! validation -> 422, inference invariant -> 500, unreadable body -> 4xx.

use crate::error::PredictError;
use crate::response::PredictionResult;
use crate::service::{ModelInfo, PredictionService};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, info_span, warn};
use uuid::Uuid;

pub fn router(service: PredictionService) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .route("/model", get(model_info))
        .merge(healthiq_core::health_routes())
        .with_state(service)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Predict(#[from] PredictError),
    #[error(transparent)]
    Body(#[from] JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Predict(PredictError::Validation(errs)) => {
                let detail: Vec<Value> = errs
                    .errors()
                    .iter()
                    .map(|e| json!({ "field": e.field, "msg": e.reason.to_string() }))
                    .collect();
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": "validation failed", "detail": detail })))
                    .into_response()
            }
            ApiError::Predict(PredictError::Inference(e)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string(), "kind": "inference_invariant" })),
            )
                .into_response(),
            ApiError::Body(rejection) => {
                (rejection.status(), Json(json!({ "error": rejection.body_text() }))).into_response()
            }
        }
    }
}

async fn predict(
    State(service): State<PredictionService>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("predict", %request_id);
    span.in_scope(|| -> Result<Json<PredictionResult>, ApiError> {
        let Json(body) = payload.map_err(|e| {
            warn!(error = %e, "unreadable request body");
            ApiError::from(e)
        })?;
        let result = service.predict(&body)?;
        info!(risk = result.risk, "prediction served");
        Ok(Json(result))
    })
}

async fn health(State(service): State<PredictionService>) -> Json<Value> {
    Json(json!({ "status": "ok", "modelVersion": service.artifact().version() }))
}

async fn model_info(State(service): State<PredictionService>) -> Json<ModelInfo> {
    Json(service.model_info())
}
