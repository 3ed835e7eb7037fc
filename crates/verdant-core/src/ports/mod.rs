//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 分類器（モデル + スケーラー）と決定ロジックをトレイトとして切り出し、
//! テストではスタブを注入できるようにします。

pub mod classifier;
pub mod decider;

// 主要な trait を再エクスポート
pub use self::classifier::{
    ClassifierHandle, FeatureScaler, InferenceError, PumpClassifier, PumpPrediction,
};
pub use self::decider::Decider;
