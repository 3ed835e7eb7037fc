//! Model artifact loading.
//!
//! The artifact is a JSON export of the trained scaler and model:
//!
//! ```json
//! {
//!   "features": ["soil_moisture", "temperature", "humidity"],
//!   "scaler": { "mean": [..], "scale": [..] },
//!   "model": { "coefficients": [..], "intercept": 0.0, "threshold": 0.5 }
//! }
//! ```
//!
//! Everything is validated here, once, so inference never has to second-guess
//! the parameters.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::FEATURE_COUNT;

use super::logistic::{LogisticRegression, ScaledClassifier, StandardScaler};

/// Column order the classifier was trained on.
pub const EXPECTED_FEATURES: [&str; FEATURE_COUNT] = ["soil_moisture", "temperature", "humidity"];

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("cannot read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} has {actual} entries, expected {expected}")]
    WrongLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field} contains a non-finite value")]
    NonFinite { field: &'static str },

    #[error("scaler.scale[{index}] is zero")]
    ZeroScale { index: usize },

    #[error("feature order {actual:?} does not match {expected:?}")]
    FeatureOrder {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("threshold {0} must be within (0, 1)")]
    Threshold(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Optional; checked against [`EXPECTED_FEATURES`] when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    pub scaler: ScalerParams,
    pub model: LogisticParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

impl ModelArtifact {
    pub fn from_json(json: &str) -> Result<Self, ModelLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate parameters and build the classifier.
    pub fn into_classifier(self) -> Result<ScaledClassifier, ModelLoadError> {
        if let Some(features) = &self.features {
            let expected: Vec<String> = EXPECTED_FEATURES.iter().map(|f| f.to_string()).collect();
            if *features != expected {
                return Err(ModelLoadError::FeatureOrder {
                    expected,
                    actual: features.clone(),
                });
            }
        }

        check_vector("scaler.mean", &self.scaler.mean)?;
        check_vector("scaler.scale", &self.scaler.scale)?;
        check_vector("model.coefficients", &self.model.coefficients)?;

        if let Some(index) = self.scaler.scale.iter().position(|s| *s == 0.0) {
            return Err(ModelLoadError::ZeroScale { index });
        }
        if !self.model.intercept.is_finite() {
            return Err(ModelLoadError::NonFinite {
                field: "model.intercept",
            });
        }
        let threshold = self.model.threshold;
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(ModelLoadError::Threshold(threshold));
        }

        Ok(ScaledClassifier::new(
            StandardScaler::new(self.scaler.mean, self.scaler.scale),
            LogisticRegression::new(self.model.coefficients, self.model.intercept, threshold),
        ))
    }
}

fn check_vector(field: &'static str, values: &[f64]) -> Result<(), ModelLoadError> {
    if values.len() != FEATURE_COUNT {
        return Err(ModelLoadError::WrongLength {
            field,
            expected: FEATURE_COUNT,
            actual: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ModelLoadError::NonFinite { field });
    }
    Ok(())
}

/// Read, parse and validate an artifact file.
pub fn load_scaled_classifier(path: impl AsRef<Path>) -> Result<ScaledClassifier, ModelLoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ModelArtifact::from_json(&json)?.into_classifier()
}
