//! Logistic-regression pump classifier with standard scaling.
//!
//! Mirrors the training pipeline: `StandardScaler` then a binary
//! `LogisticRegression`. Parameters come from a model artifact (see
//! `artifact.rs`); nothing here touches the filesystem.

use crate::ports::{FeatureScaler, InferenceError, PumpClassifier, PumpPrediction};

/// `(x - mean) / scale`, per feature.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Caller guarantees equal lengths and non-zero scales (checked by the
    /// artifact loader).
    pub(crate) fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if features.len() != self.mean.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }

        features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .enumerate()
            .map(|(index, (x, (mean, scale)))| {
                let scaled = (x - mean) / scale;
                if scaled.is_finite() {
                    Ok(scaled)
                } else {
                    Err(InferenceError::NonFiniteFeature { index })
                }
            })
            .collect()
    }
}

/// Binary logistic regression: `σ(w·x + b) >= threshold` ⇒ label 1.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    coefficients: Vec<f64>,
    intercept: f64,
    threshold: f64,
}

impl LogisticRegression {
    pub(crate) fn new(coefficients: Vec<f64>, intercept: f64, threshold: f64) -> Self {
        Self {
            coefficients,
            intercept,
            threshold,
        }
    }

    /// Probability of label 1 for already-scaled features.
    pub fn probability(&self, scaled: &[f64]) -> Result<f64, InferenceError> {
        if scaled.len() != self.coefficients.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: self.coefficients.len(),
                actual: scaled.len(),
            });
        }
        let z: f64 = self
            .coefficients
            .iter()
            .zip(scaled)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        Ok(1.0 / (1.0 + (-z).exp()))
    }

    pub fn predict_scaled(&self, scaled: &[f64]) -> Result<PumpPrediction, InferenceError> {
        let p = self.probability(scaled)?;
        if p.is_nan() {
            return Err(InferenceError::Backend("probability is NaN".to_string()));
        }
        PumpPrediction::from_label(i64::from(p >= self.threshold))
    }
}

/// Scaler + model, consulted on raw readings.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledClassifier {
    scaler: StandardScaler,
    model: LogisticRegression,
}

impl ScaledClassifier {
    pub fn new(scaler: StandardScaler, model: LogisticRegression) -> Self {
        Self { scaler, model }
    }
}

impl PumpClassifier for ScaledClassifier {
    fn predict(&self, features: &[f64]) -> Result<PumpPrediction, InferenceError> {
        let scaled = self.scaler.transform(features)?;
        self.model.predict_scaled(&scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ScaledClassifier {
        // Pump on when soil is drier than the mean.
        ScaledClassifier::new(
            StandardScaler::new(vec![50.0, 25.0, 60.0], vec![10.0, 5.0, 15.0]),
            LogisticRegression::new(vec![-3.0, 0.0, 0.0], 0.0, 0.5),
        )
    }

    #[test]
    fn scaler_standardizes_each_feature() {
        let scaler = StandardScaler::new(vec![50.0, 25.0, 60.0], vec![10.0, 5.0, 15.0]);
        assert_eq!(scaler.transform(&[60.0, 20.0, 60.0]).unwrap(), vec![1.0, -1.0, 0.0]);
    }

    #[test]
    fn scaler_rejects_wrong_shape() {
        let scaler = StandardScaler::new(vec![0.0; 3], vec![1.0; 3]);
        assert_eq!(
            scaler.transform(&[1.0, 2.0]),
            Err(InferenceError::ShapeMismatch { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn scaler_rejects_non_finite_result() {
        let scaler = StandardScaler::new(vec![0.0; 3], vec![1.0; 3]);
        assert_eq!(
            scaler.transform(&[1.0, f64::INFINITY, 2.0]),
            Err(InferenceError::NonFiniteFeature { index: 1 })
        );
    }

    #[test]
    fn probability_is_one_half_at_the_decision_boundary() {
        let model = LogisticRegression::new(vec![1.0, 1.0, 1.0], 0.0, 0.5);
        let p = model.probability(&[0.0, 0.0, 0.0]).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
        assert_eq!(model.predict_scaled(&[0.0, 0.0, 0.0]), Ok(PumpPrediction::On));
    }

    #[test]
    fn dry_soil_predicts_on_and_wet_soil_predicts_off() {
        let c = classifier();
        assert_eq!(c.predict(&[30.0, 25.0, 60.0]), Ok(PumpPrediction::On));
        assert_eq!(c.predict(&[70.0, 25.0, 60.0]), Ok(PumpPrediction::Off));
    }
}
