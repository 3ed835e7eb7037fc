//! Status - ヘルスチェック
//!
//! 分類器が読み込まれているかどうかを外部に報告する。
//! コアの判定には関与しない。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::ClassifierHandle;

/// Readiness report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub checked_at: DateTime<Utc>,
}

impl HealthStatus {
    pub fn from_handle(classifier: &ClassifierHandle, checked_at: DateTime<Utc>) -> Self {
        Self {
            status: "ok".to_string(),
            model_loaded: classifier.is_available(),
            checked_at,
        }
    }
}
