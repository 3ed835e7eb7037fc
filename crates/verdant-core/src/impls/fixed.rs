//! Test doubles for the classifier port.
//!
//! `FixedClassifier` always answers the same label and records what it was
//! asked; `FailingClassifier` always errors. Used by unit/integration tests
//! and for dry runs without a model file.

use std::sync::{Arc, Mutex};

use crate::ports::{InferenceError, PumpClassifier, PumpPrediction};

#[derive(Debug, Clone)]
pub struct FixedClassifier {
    prediction: PumpPrediction,
    seen: Arc<Mutex<Seen>>,
}

#[derive(Debug, Default)]
struct Seen {
    calls: usize,
    last_features: Option<Vec<f64>>,
}

impl FixedClassifier {
    pub fn new(prediction: PumpPrediction) -> Self {
        Self {
            prediction,
            seen: Arc::new(Mutex::new(Seen::default())),
        }
    }

    /// Number of `predict` calls across all clones.
    pub fn calls(&self) -> usize {
        self.seen.lock().map(|s| s.calls).unwrap_or_default()
    }

    pub fn last_features(&self) -> Option<Vec<f64>> {
        self.seen.lock().ok().and_then(|s| s.last_features.clone())
    }
}

impl PumpClassifier for FixedClassifier {
    fn predict(&self, features: &[f64]) -> Result<PumpPrediction, InferenceError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.calls += 1;
            seen.last_features = Some(features.to_vec());
        }
        Ok(self.prediction)
    }
}

#[derive(Debug, Clone)]
pub struct FailingClassifier {
    error: InferenceError,
}

impl FailingClassifier {
    pub fn new(error: InferenceError) -> Self {
        Self { error }
    }
}

impl PumpClassifier for FailingClassifier {
    fn predict(&self, _features: &[f64]) -> Result<PumpPrediction, InferenceError> {
        Err(self.error.clone())
    }
}
