//! Input validation: the parsing boundary between untyped JSON and
//! [`HealthIndicators`].
//!
//! Fail-closed: every serving field must be present, numeric and in range,
//! and any key outside the schema is rejected. All problems are reported,
//! schema fields first (in schema order), then unrecognized keys (sorted).

use crate::error::{ValidationError, ValidationErrors, ValidationReason};
use crate::indicators::HealthIndicators;
use crate::schema::{field_spec, HEALTH_FIELDS};
use serde_json::{Map, Value};

pub fn validate(raw: &Value) -> Result<HealthIndicators, ValidationErrors> {
    match raw {
        Value::Object(map) => validate_map(map),
        other => Err(ValidationErrors::single(ValidationError::new(
            "body",
            ValidationReason::NotAnObject(json_type(other)),
        ))),
    }
}

pub fn validate_map(map: &Map<String, Value>) -> Result<HealthIndicators, ValidationErrors> {
    let mut record = HealthIndicators::default();
    let mut errors = Vec::new();

    for spec in HEALTH_FIELDS.iter() {
        let reason = match map.get(spec.name) {
            None => Some(ValidationReason::Missing),
            Some(value) => match value.as_f64() {
                None => Some(ValidationReason::NotNumeric(json_type(value))),
                Some(v) if !spec.contains(v) => {
                    Some(ValidationReason::OutOfRange { value: v, min: spec.min, max: spec.max })
                }
                Some(v) => {
                    record.set(spec.name, v);
                    None
                }
            },
        };
        if let Some(reason) = reason {
            errors.push(ValidationError::new(spec.name, reason));
        }
    }

    let mut unknown: Vec<&String> = map.keys().filter(|k| field_spec(k).is_none()).collect();
    unknown.sort();
    errors.extend(unknown.into_iter().map(|k| ValidationError::new(k.clone(), ValidationReason::Unrecognized)));

    match ValidationErrors::from_vec(errors) {
        Some(errs) => Err(errs),
        None => Ok(record),
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
