//! Feature schema: the ordered feature names a scorer expects, and the
//! domain bounds the validator enforces for each serving field.

use thiserror::Error;

/// Inclusive bounds for one serving field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
}

impl FieldSpec {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Serving fields in model order (Pima indicators, camelCase on the wire).
pub const HEALTH_FIELDS: [FieldSpec; 8] = [
    FieldSpec { name: "pregnancies", min: 0.0, max: 20.0 },
    FieldSpec { name: "glucose", min: 0.0, max: 300.0 },
    FieldSpec { name: "bloodPressure", min: 0.0, max: 250.0 },
    FieldSpec { name: "skinThickness", min: 0.0, max: 100.0 },
    FieldSpec { name: "insulin", min: 0.0, max: 1000.0 },
    FieldSpec { name: "bmi", min: 10.0, max: 60.0 },
    FieldSpec { name: "diabetesPedigree", min: 0.0, max: 3.0 },
    FieldSpec { name: "age", min: 1.0, max: 120.0 },
];

pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    HEALTH_FIELDS.iter().find(|f| f.name == name)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("feature schema is empty")]
    Empty,
    #[error("feature name at position {0} is blank")]
    BlankName(usize),
    #[error("feature {0:?} appears more than once")]
    Duplicate(String),
}

/// Ordered, immutable list of unique feature names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn new<I, S>(names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(SchemaError::BlankName(i));
            }
            if names[..i].contains(name) {
                return Err(SchemaError::Duplicate(name.clone()));
            }
        }
        Ok(Self { names })
    }

    /// The schema the HTTP surface accepts.
    pub fn serving() -> Self {
        Self { names: HEALTH_FIELDS.iter().map(|f| f.name.to_string()).collect() }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// First difference against `expected`, or `None` when identical
    /// (same names, same order).
    pub fn mismatch(&self, expected: &FeatureSchema) -> Option<String> {
        if let Some(missing) = expected.names.iter().find(|n| self.position(n).is_none()) {
            return Some(format!("feature {missing:?} is absent"));
        }
        if let Some(extra) = self.names.iter().find(|n| expected.position(n).is_none()) {
            return Some(format!("unexpected feature {extra:?}"));
        }
        self.names
            .iter()
            .zip(expected.names.iter())
            .enumerate()
            .find(|(_, (got, want))| got != want)
            .map(|(i, (got, want))| format!("order differs at position {i}: expected {want:?}, found {got:?}"))
    }
}
