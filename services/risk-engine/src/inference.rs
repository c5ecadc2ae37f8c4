//! Inference engine: validated indicators -> ordered feature vector ->
//! scorer -> probability.
//!
//! Features are read by name in the order of the artifact's embedded
//! schema, never by payload position. Out-of-range scorer output is
//! rejected rather than clamped.

use crate::artifact::ModelArtifact;
use crate::error::InferenceError;
use crate::indicators::HealthIndicators;
use crate::schema::FeatureSchema;
use tracing::error;

/// Ordered feature values, one per schema name.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn build(indicators: &HealthIndicators, schema: &FeatureSchema) -> Result<Self, InferenceError> {
        schema
            .names()
            .iter()
            .map(|name| indicators.get(name).ok_or_else(|| InferenceError::MissingFeature(name.clone())))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn infer(indicators: &HealthIndicators, artifact: &ModelArtifact) -> Result<f64, InferenceError> {
    let vector = FeatureVector::build(indicators, artifact.schema()).map_err(|e| {
        error!(error = %e, version = artifact.version(), "feature schema drift");
        e
    })?;

    let scorer = artifact.scorer();
    if vector.len() != scorer.n_features() {
        let e = InferenceError::FeatureCount { expected: scorer.n_features(), actual: vector.len() };
        error!(error = %e, version = artifact.version(), kind = scorer.kind(), "feature count mismatch");
        return Err(e);
    }

    let p = scorer.predict_probability(vector.as_slice());
    // NaN fails the range check too.
    if !(0.0..=1.0).contains(&p) {
        let e = InferenceError::ProbabilityOutOfRange(p);
        error!(error = %e, version = artifact.version(), kind = scorer.kind(), "scorer emitted a non-probability");
        return Err(e);
    }
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Scorer;
    use std::sync::Arc;

    /// Returns a fixed value; records nothing.
    #[derive(Debug)]
    struct Fixed(f64, usize);

    impl Scorer for Fixed {
        fn predict_probability(&self, _features: &[f64]) -> f64 {
            self.0
        }
        fn n_features(&self) -> usize {
            self.1
        }
        fn kind(&self) -> &'static str {
            "fixed"
        }
    }

    /// Echoes the first feature, to observe ordering.
    #[derive(Debug)]
    struct First;

    impl Scorer for First {
        fn predict_probability(&self, features: &[f64]) -> f64 {
            features[0] / 100.0
        }
        fn n_features(&self) -> usize {
            8
        }
        fn kind(&self) -> &'static str {
            "first"
        }
    }

    fn indicators() -> HealthIndicators {
        HealthIndicators {
            pregnancies: 2.0,
            glucose: 130.0,
            blood_pressure: 70.0,
            skin_thickness: 25.0,
            insulin: 80.0,
            bmi: 28.5,
            diabetes_pedigree: 0.35,
            age: 45.0,
        }
    }

    fn artifact(scorer: Arc<dyn Scorer>, schema: FeatureSchema) -> ModelArtifact {
        ModelArtifact::new(schema, scorer, "test")
    }

    #[test]
    fn vector_follows_schema_order() {
        let v = FeatureVector::build(&indicators(), &FeatureSchema::serving()).unwrap();
        assert_eq!(v.as_slice(), &[2.0, 130.0, 70.0, 25.0, 80.0, 28.5, 0.35, 45.0]);

        let reversed = FeatureSchema::new(FeatureSchema::serving().names().iter().rev().cloned()).unwrap();
        let v = FeatureVector::build(&indicators(), &reversed).unwrap();
        assert_eq!(v.as_slice()[0], 45.0);
    }

    #[test]
    fn reads_by_artifact_schema() {
        let reversed = FeatureSchema::new(FeatureSchema::serving().names().iter().rev().cloned()).unwrap();
        let p = infer(&indicators(), &artifact(Arc::new(First), reversed)).unwrap();
        assert!((p - 0.45).abs() < 1e-12);
    }

    #[test]
    fn unknown_schema_feature() {
        let schema = FeatureSchema::new(["glucose", "HbA1c"]).unwrap();
        let err = infer(&indicators(), &artifact(Arc::new(Fixed(0.3, 2)), schema)).unwrap_err();
        assert_eq!(err, InferenceError::MissingFeature("HbA1c".into()));
    }

    #[test]
    fn feature_count_mismatch() {
        let err = infer(&indicators(), &artifact(Arc::new(Fixed(0.3, 21)), FeatureSchema::serving())).unwrap_err();
        assert_eq!(err, InferenceError::FeatureCount { expected: 21, actual: 8 });
    }

    #[test]
    fn out_of_range_output_rejected() {
        for bad in [-0.01, 1.5, f64::NAN, f64::INFINITY] {
            let res = infer(&indicators(), &artifact(Arc::new(Fixed(bad, 8)), FeatureSchema::serving()));
            assert!(matches!(res, Err(InferenceError::ProbabilityOutOfRange(_))), "{bad}");
        }
    }

    #[test]
    fn bounds_inclusive() {
        for ok in [0.0, 1.0] {
            assert_eq!(infer(&indicators(), &artifact(Arc::new(Fixed(ok, 8)), FeatureSchema::serving())), Ok(ok));
        }
    }
}
