//! Model artifact loading.
//!
//! The artifact is read once at startup and never mutated afterwards. It
//! carries the scorer parameters, the feature schema used at training time
//! and optionally a version label. Any defect is a [`StartupError`]; the
//! process must not serve with a half-valid model.
//!
//! On-disk layout (JSON, or YAML for `.yaml`/`.yml`):
//!
//! ```json
//! {
//!   "format": "healthiq.model/v1",
//!   "version": "pima-logreg-1",
//!   "features": ["pregnancies", "glucose", "..."],
//!   "model": {
//!     "type": "logistic_regression",
//!     "scaler": { "mean": [..], "scale": [..] },
//!     "coefficients": [..],
//!     "intercept": -0.87
//!   }
//! }
//! ```

use crate::error::StartupError;
use crate::schema::FeatureSchema;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub const ARTIFACT_FORMAT: &str = "healthiq.model/v1";

/// Opaque scoring object: feature vector in, positive-class probability out.
pub trait Scorer: Send + Sync + Debug {
    fn predict_probability(&self, features: &[f64]) -> f64;
    fn n_features(&self) -> usize;
    fn kind(&self) -> &'static str;
}

/// Standardised logistic regression (`StandardScaler` then `LogisticRegression`).
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    mean: Vec<f64>,
    scale: Vec<f64>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>, coefficients: Vec<f64>, intercept: f64) -> Result<Self, String> {
        let n = coefficients.len();
        if n == 0 {
            return Err("no coefficients".into());
        }
        if mean.len() != n || scale.len() != n {
            return Err(format!(
                "scaler has {} means and {} scales for {n} coefficients",
                mean.len(),
                scale.len()
            ));
        }
        if !intercept.is_finite() || coefficients.iter().chain(&mean).chain(&scale).any(|v| !v.is_finite()) {
            return Err("non-finite model parameter".into());
        }
        if let Some(i) = scale.iter().position(|s| *s == 0.0) {
            return Err(format!("scale at position {i} is zero"));
        }
        Ok(Self { mean, scale, coefficients, intercept })
    }

    fn unscaled(coefficients: Vec<f64>, intercept: f64) -> Result<Self, String> {
        let n = coefficients.len();
        Self::new(vec![0.0; n], vec![1.0; n], coefficients, intercept)
    }
}

impl Scorer for LogisticRegression {
    fn predict_probability(&self, features: &[f64]) -> f64 {
        let z = features
            .iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .zip(&self.coefficients)
            .map(|(((x, m), s), c)| c * (x - m) / s)
            .sum::<f64>()
            + self.intercept;
        sigmoid(z)
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn kind(&self) -> &'static str {
        "logistic_regression"
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[derive(Debug, Deserialize)]
struct ArtifactFile {
    format: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    features: Option<Vec<String>>,
    model: ModelSpec,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ModelSpec {
    LogisticRegression {
        #[serde(default)]
        scaler: Option<ScalerSpec>,
        coefficients: Vec<f64>,
        intercept: f64,
    },
}

#[derive(Debug, Deserialize)]
struct ScalerSpec {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

/// Shared, read-only model state for the process lifetime.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    schema: FeatureSchema,
    scorer: Arc<dyn Scorer>,
    version: String,
    sha256: Option<String>,
}

impl ModelArtifact {
    pub fn new(schema: FeatureSchema, scorer: Arc<dyn Scorer>, version: impl Into<String>) -> Self {
        Self { schema, scorer, version: version.into(), sha256: None }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub path: PathBuf,
    /// Deployment-time label; wins over the version embedded in the file.
    pub version: Option<String>,
    /// Hex SHA-256 the file must hash to.
    pub expected_sha256: Option<String>,
}

impl LoadOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), version: None, expected_sha256: None }
    }
}

/// Load and verify the artifact against the serving schema.
pub fn load(opts: &LoadOptions) -> Result<ModelArtifact, StartupError> {
    load_with_schema(opts, &FeatureSchema::serving())
}

pub fn load_with_schema(opts: &LoadOptions, serving: &FeatureSchema) -> Result<ModelArtifact, StartupError> {
    let path = opts.path.as_path();
    if !path.exists() {
        return Err(StartupError::ArtifactMissing(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| StartupError::Io { path: path.to_path_buf(), source })?;

    let digest = hex::encode(Sha256::digest(&bytes));
    if let Some(expected) = opts.expected_sha256.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        if !expected.eq_ignore_ascii_case(&digest) {
            return Err(StartupError::ChecksumMismatch { expected: expected.to_string(), actual: digest });
        }
    }

    let file = parse(path, &bytes)?;
    if file.format != ARTIFACT_FORMAT {
        return Err(StartupError::UnsupportedFormat(file.format));
    }

    let names = file.features.ok_or_else(|| corrupt(path, "artifact embeds no feature schema"))?;
    let schema = FeatureSchema::new(names)?;
    if let Some(diff) = schema.mismatch(serving) {
        return Err(StartupError::SchemaMismatch(diff));
    }

    let scorer: Arc<dyn Scorer> = match file.model {
        ModelSpec::LogisticRegression { scaler, coefficients, intercept } => {
            let lr = match scaler {
                Some(s) => LogisticRegression::new(s.mean, s.scale, coefficients, intercept),
                None => LogisticRegression::unscaled(coefficients, intercept),
            }
            .map_err(|reason| corrupt(path, reason))?;
            Arc::new(lr)
        }
    };
    if scorer.n_features() != schema.len() {
        return Err(corrupt(
            path,
            format!("model takes {} features, schema lists {}", scorer.n_features(), schema.len()),
        ));
    }

    let version = resolve_version(opts.version.as_deref(), file.version.as_deref())?;
    info!(
        path = %path.display(),
        %version,
        kind = scorer.kind(),
        features = schema.len(),
        sha256 = %digest,
        "model artifact loaded"
    );
    Ok(ModelArtifact { schema, scorer, version, sha256: Some(digest) })
}

fn parse(path: &Path, bytes: &[u8]) -> Result<ArtifactFile, StartupError> {
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("yaml" | "yml")
    );
    if yaml {
        serde_yaml::from_slice(bytes).map_err(|e| corrupt(path, e.to_string()))
    } else {
        serde_json::from_slice(bytes).map_err(|e| corrupt(path, e.to_string()))
    }
}

fn resolve_version(configured: Option<&str>, embedded: Option<&str>) -> Result<String, StartupError> {
    configured
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| embedded.map(str::trim).filter(|v| !v.is_empty()))
        .map(str::to_string)
        .ok_or(StartupError::MissingVersion)
}

fn corrupt(path: &Path, reason: impl Into<String>) -> StartupError {
    StartupError::Corrupt { path: path.to_path_buf(), reason: reason.into() }
}
