//! Errors - エラー型と分類
//!
//! - `ValidationError`: 入力不正。リクエスト単位で失敗させる
//! - `ArbitrationError`: 決定の組み立て中の想定外の不整合
//! - `DecisionError`: 上記をロケーション ID 付きでまとめたもの
//!
//! 分類器の推論エラー（`ports::InferenceError`）はここには現れない。
//! ポンプ判定の中で吸収され、ルール層にフォールバックする。

use thiserror::Error;

use super::decision::{Action, Actuator};
use super::request::LocationId;

/// Sensor or configuration input that cannot be arbitrated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("locationId must not be empty")]
    EmptyLocationId,

    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Missing or non-numeric fields, caught while decoding the request.
    #[error("malformed request: {0}")]
    Malformed(String),
}

impl ValidationError {
    pub(crate) fn check_finite(field: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Self::NonFinite { field, value })
        }
    }

    pub(crate) fn check_percent(field: &'static str, value: f64) -> Result<(), Self> {
        Self::check_finite(field, value)?;
        if (0.0..=100.0).contains(&value) {
            Ok(())
        } else {
            Err(Self::OutOfRange {
                field,
                value,
                min: 0.0,
                max: 100.0,
            })
        }
    }

    /// The offending field, when the error is about a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::NonFinite { field, .. } | Self::OutOfRange { field, .. } => Some(*field),
            Self::EmptyLocationId => Some("locationId"),
            Self::Malformed(_) => None,
        }
    }
}

/// Unexpected fault while composing the combined decision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArbitrationError {
    #[error("{slot:?} slot received {action:?}")]
    MisroutedAction { slot: Actuator, action: Action },

    #[error("{action:?} decision is inconsistent: {detail}")]
    BrokenInvariant {
        action: Action,
        detail: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecisionErrorKind {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("internal arbitration fault: {0}")]
    Arbitration(#[from] ArbitrationError),
}

/// Request-level failure, tagged with the location so operators can
/// correlate it to a physical site.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("decision failed for location {location_id}: {kind}")]
pub struct DecisionError {
    pub location_id: LocationId,
    pub kind: DecisionErrorKind,
}

impl DecisionError {
    pub fn new(location_id: LocationId, kind: impl Into<DecisionErrorKind>) -> Self {
        Self {
            location_id,
            kind: kind.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.kind, DecisionErrorKind::Validation(_))
    }

    /// HTTP-style status for transports that want one.
    pub fn status_code(&self) -> u16 {
        match self.kind {
            DecisionErrorKind::Validation(_) => 422,
            DecisionErrorKind::Arbitration(_) => 500,
        }
    }
}
