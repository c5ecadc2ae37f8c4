use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Canonical response: `{ risk, modelVersion, ts }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub risk: f64,
    pub model_version: String,
    pub ts: String,
}

pub fn build(risk: f64, version: &str) -> PredictionResult {
    build_at(risk, version, Utc::now())
}

pub fn build_at(risk: f64, version: &str, at: DateTime<Utc>) -> PredictionResult {
    PredictionResult {
        risk,
        model_version: version.to_string(),
        ts: at.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
