//! Classifier port - 学習済みポンプ分類器の抽象化
//!
//! 分類器はプロセス起動時に一度だけ読み込まれ、以後は読み取り専用で共有される。
//! 読み込めなかった場合も正常な運転モードとして扱う（`ClassifierHandle::Absent`）。
//!
//! # 設計原則
//! - 推論は `Result` を返す（例外 → フォールバックの暗黙処理をしない）
//! - `Send + Sync` を要求（リクエスト間でロックなしに共有）

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Binary pump label produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PumpPrediction {
    /// Label `0`.
    Off,
    /// Label `1`.
    On,
}

impl PumpPrediction {
    /// Map a raw model label onto a prediction. Anything but 0/1 is a fault.
    pub fn from_label(label: i64) -> Result<Self, InferenceError> {
        match label {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            other => Err(InferenceError::UnexpectedLabel(other)),
        }
    }
}

/// Per-request inference fault. Always absorbed by the pump step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("feature {index} is not finite after scaling")]
    NonFiniteFeature { index: usize },

    #[error("classifier produced label {0}, expected 0 or 1")]
    UnexpectedLabel(i64),

    #[error("classifier backend failed: {0}")]
    Backend(String),
}

/// Feature normalization applied before prediction.
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// Pump on/off classifier over raw `[soil_moisture, temperature, humidity]`.
///
/// Implementations that need scaling do it themselves (see
/// `impls::ScaledClassifier`); callers always pass raw readings.
pub trait PumpClassifier: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<PumpPrediction, InferenceError>;
}

/// Classifier availability, fixed for the lifetime of the process.
#[derive(Clone, Default)]
pub enum ClassifierHandle {
    /// No model loaded (never configured, or loading failed at startup).
    #[default]
    Absent,
    Present(Arc<dyn PumpClassifier>),
}

impl ClassifierHandle {
    pub fn present(classifier: impl PumpClassifier + 'static) -> Self {
        Self::Present(Arc::new(classifier))
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn as_classifier(&self) -> Option<&dyn PumpClassifier> {
        match self {
            Self::Absent => None,
            Self::Present(classifier) => Some(classifier.as_ref()),
        }
    }
}

impl fmt::Debug for ClassifierHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("ClassifierHandle::Absent"),
            Self::Present(_) => f.write_str("ClassifierHandle::Present(..)"),
        }
    }
}
