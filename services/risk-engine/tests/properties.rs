//! Seeded randomized checks against the bundled model.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use risk_engine::schema::HEALTH_FIELDS;
use risk_engine::{load, LoadOptions, ModelArtifact, PredictionService};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

fn service() -> PredictionService {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("models/pima-logreg.json");
    let artifact: ModelArtifact = load(&LoadOptions::new(path)).expect("bundled artifact");
    PredictionService::new(Arc::new(artifact))
}

fn random_record(rng: &mut StdRng) -> Vec<(&'static str, f64)> {
    HEALTH_FIELDS
        .iter()
        .map(|f| {
            let v = if rng.gen_bool(0.1) {
                // Edges are legal values too.
                if rng.gen_bool(0.5) { f.min } else { f.max }
            } else {
                rng.gen_range(f.min..=f.max)
            };
            (f.name, v)
        })
        .collect()
}

fn to_value(pairs: &[(&str, f64)]) -> Value {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), Value::from(*v));
    }
    Value::Object(map)
}

#[test]
fn risk_is_a_probability_for_any_valid_record() {
    let svc = service();
    let mut rng = StdRng::seed_from_u64(0x4845_414c);
    for _ in 0..500 {
        let record = random_record(&mut rng);
        let out = svc.predict(&to_value(&record)).unwrap_or_else(|e| panic!("{record:?}: {e}"));
        assert!((0.0..=1.0).contains(&out.risk), "{record:?} -> {}", out.risk);
        assert_eq!(out.model_version, "pima-logreg-2024.09");
    }
}

#[test]
fn same_input_same_risk() {
    let svc = service();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let body = to_value(&random_record(&mut rng));
        let a = svc.predict(&body).unwrap();
        let b = svc.predict(&body).unwrap();
        assert_eq!(a.risk.to_bits(), b.risk.to_bits());
    }
}

#[test]
fn key_order_does_not_matter() {
    let svc = service();
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..100 {
        let mut record = random_record(&mut rng);
        let baseline = svc.predict(&to_value(&record)).unwrap().risk;
        record.shuffle(&mut rng);
        let shuffled = svc.predict(&to_value(&record)).unwrap().risk;
        assert_eq!(baseline.to_bits(), shuffled.to_bits(), "{record:?}");
    }
}

#[test]
fn any_out_of_range_field_is_rejected() {
    let svc = service();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..100 {
        let mut record = random_record(&mut rng);
        let i = rng.gen_range(0..record.len());
        let spec = &HEALTH_FIELDS[i];
        record[i].1 = if rng.gen_bool(0.5) { spec.min - 1.0 } else { spec.max + 1.0 };
        let err = svc.predict(&to_value(&record)).unwrap_err();
        assert!(err.to_string().contains(spec.name), "{err}");
    }
}
