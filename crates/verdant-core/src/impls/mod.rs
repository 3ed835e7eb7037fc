//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **ScaledClassifier**: StandardScaler + LogisticRegression（本番用）
//! - **ModelArtifact**: 学習済みパラメータ（JSON）の読み込みと検証
//! - **FixedClassifier / FailingClassifier**: テスト・ドライラン用

pub mod artifact;
pub mod fixed;
pub mod logistic;

// 主要な型を再エクスポート
pub use self::artifact::{ModelArtifact, ModelLoadError, load_scaled_classifier};
pub use self::fixed::{FailingClassifier, FixedClassifier};
pub use self::logistic::{LogisticRegression, ScaledClassifier, StandardScaler};
