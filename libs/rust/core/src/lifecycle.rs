//! Serving lifecycle: UNINITIALIZED until the model artifact is loaded,
//! then READY for the rest of the process.
//!
//! There is no way back to UNINITIALIZED short of a restart.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServingPhase {
    Uninitialized,
    Ready,
}

const UNINITIALIZED: u8 = 0;
const READY: u8 = 1;

static PHASE: AtomicU8 = AtomicU8::new(UNINITIALIZED);

pub fn mark_ready() {
    if PHASE.swap(READY, Ordering::SeqCst) == UNINITIALIZED {
        tracing::info!(target: "healthiq", "serving phase UNINITIALIZED -> READY");
    }
}

pub fn serving_phase() -> ServingPhase {
    match PHASE.load(Ordering::SeqCst) {
        READY => ServingPhase::Ready,
        _ => ServingPhase::Uninitialized,
    }
}

pub fn is_ready() -> bool {
    serving_phase() == ServingPhase::Ready
}
