//! App - アプリケーション層
//!
//! domain と ports を組み合わせて判定ロジックを実装します。
//!
//! # 主要コンポーネント
//! - **urgency / pump / fan**: 各層（緊急・学習・ルール）の判定
//! - **Arbiter**: 層を優先順位どおりに合成して CombinedDecision を生成
//! - **DecisionService**: リクエストの検証とエラー変換
//! - **AppBuilder**: 起動時のワイヤリング（モデル読み込みを含む）
//! - **HealthStatus**: ヘルスチェック

pub mod arbiter;
pub mod builder;
pub mod fan;
pub mod pump;
pub mod service;
pub mod status;
pub mod urgency;

// 主要な型を再エクスポート
pub use self::arbiter::{Arbiter, arbitrate};
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::fan::decide_fan_by_rules;
pub use self::pump::{
    LearnedOutcome, MoistureScale, TEMP_SAFETY_MARGIN, consult_classifier, decide_pump,
    decide_pump_by_rules,
};
pub use self::service::{DecisionService, ErrorResponse};
pub use self::status::HealthStatus;
pub use self::urgency::{
    CRITICAL_HUMIDITY, CRITICAL_SOIL_MOISTURE, CRITICAL_TEMPERATURE, UrgentDecision,
    evaluate_urgency,
};
