//! Request pipeline over a shared artifact: validate -> infer -> build.

use crate::artifact::ModelArtifact;
use crate::error::PredictError;
use crate::inference::infer;
use crate::response::{build, PredictionResult};
use crate::validate::validate;
use healthiq_core::{Outcome, PREDICTION_METRICS};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub model_version: String,
    pub kind: String,
    pub features: Vec<String>,
    pub sha256: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PredictionService {
    artifact: Arc<ModelArtifact>,
}

impl PredictionService {
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    #[instrument(skip_all, fields(version = self.artifact.version()))]
    pub fn predict(&self, raw: &Value) -> Result<PredictionResult, PredictError> {
        let start = Instant::now();
        let indicators = validate(raw).map_err(|e| {
            PREDICTION_METRICS.record(Outcome::Invalid);
            debug!(fields = %e, "payload rejected");
            e
        })?;
        let risk = infer(&indicators, &self.artifact).map_err(|e| {
            PREDICTION_METRICS.record(Outcome::Invariant);
            e
        })?;
        let result = build(risk, self.artifact.version());
        PREDICTION_METRICS.record(Outcome::Ok);
        PREDICTION_METRICS.observe(start.elapsed());
        debug!(risk, "scored");
        Ok(result)
    }

    pub fn model_info(&self) -> ModelInfo {
        let art = &self.artifact;
        ModelInfo {
            model_version: art.version().to_string(),
            kind: art.scorer().kind().to_string(),
            features: art.schema().names().to_vec(),
            sha256: art.sha256().map(str::to_string),
        }
    }
}
