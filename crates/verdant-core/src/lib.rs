//! verdant-core
//!
//! Decision arbitration for an irrigation / climate controller: given one
//! sensor snapshot and the location's thresholds, decide the pump and the
//! fan.
//!
//! # モジュール構成
//! - **domain**: 値型（SensorSnapshot, Configuration, ActuatorDecision, CombinedDecision, errors）
//! - **ports**: 抽象化レイヤー（PumpClassifier, FeatureScaler, Decider）
//! - **app**: 判定ロジック（urgency → learned → rules）と起動時ワイヤリング
//! - **impls**: 実装（ロジスティック回帰分類器、モデル読み込み、テスト用スタブ）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
