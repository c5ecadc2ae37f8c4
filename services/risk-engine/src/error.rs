//! Error taxonomy: fatal startup errors, per-request validation errors and
//! per-request inference invariant violations.

use crate::schema::SchemaError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The process cannot serve traffic.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("model artifact not found at {}", .0.display())]
    ArtifactMissing(PathBuf),
    #[error("reading model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact {} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("unsupported model artifact format {0:?}")]
    UnsupportedFormat(String),
    #[error("model artifact feature schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("model artifact feature schema differs from serving schema: {0}")]
    SchemaMismatch(String),
    #[error("model artifact checksum mismatch expected={expected} got={actual}")]
    ChecksumMismatch { expected: String, actual: String },
    #[error("no model version configured and the artifact embeds none")]
    MissingVersion,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationReason {
    #[error("payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("field required")]
    Missing,
    #[error("unrecognized field")]
    Unrecognized,
    #[error("expected a number, got {0}")]
    NotNumeric(&'static str),
    #[error("value {value} is outside [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
}

/// One offending field.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: ValidationReason) -> Self {
        Self { field: field.into(), reason }
    }
}

/// Every problem found in one payload. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub(crate) fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub(crate) fn single(error: ValidationError) -> Self {
        Self(vec![error])
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }

    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Artifact/schema drift detected while scoring. Never coerced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("feature {0:?} required by the model artifact is not in the validated input")]
    MissingFeature(String),
    #[error("feature vector has {actual} values, scorer expects {expected}")]
    FeatureCount { expected: usize, actual: usize },
    #[error("scorer returned {0}, outside [0, 1]")]
    ProbabilityOutOfRange(f64),
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("inference invariant violated: {0}")]
    Inference(#[from] InferenceError),
}
