//! Prediction metrics registered in the default Prometheus registry.

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter_vec, register_int_gauge_vec, Histogram, IntCounterVec, IntGaugeVec,
};
use std::time::Duration;

/// Terminal state of one prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Invalid,
    Invariant,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Invalid => "invalid",
            Outcome::Invariant => "invariant",
        }
    }
}

pub struct PredictionMetrics {
    pub predictions_total: IntCounterVec,
    pub inference_latency: Histogram,
    pub model_info: IntGaugeVec,
}

pub static PREDICTION_METRICS: Lazy<PredictionMetrics> = Lazy::new(|| PredictionMetrics {
    predictions_total: register_int_counter_vec!(
        "healthiq_predictions_total",
        "Prediction requests by outcome",
        &["outcome"]
    )
    .expect("static metric definition"),
    inference_latency: register_histogram!(
        "healthiq_inference_latency_seconds",
        "Validate + score + build latency per prediction",
        vec![0.000_05, 0.000_1, 0.000_25, 0.000_5, 0.001, 0.0025, 0.005, 0.01, 0.05]
    )
    .expect("static metric definition"),
    model_info: register_int_gauge_vec!("healthiq_model_info", "Loaded model artifact", &["version", "kind"])
        .expect("static metric definition"),
});

impl PredictionMetrics {
    pub fn record(&self, outcome: Outcome) {
        self.predictions_total.with_label_values(&[outcome.as_str()]).inc();
    }

    pub fn observe(&self, elapsed: Duration) {
        self.inference_latency.observe(elapsed.as_secs_f64());
    }

    pub fn set_model(&self, version: &str, kind: &str) {
        self.model_info.with_label_values(&[version, kind]).set(1);
    }
}
