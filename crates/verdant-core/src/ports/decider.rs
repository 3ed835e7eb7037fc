//! Decider port - センサー値と設定から CombinedDecision を生成
//!
//! Decider は純粋関数として設計されます（副作用はログのみ）。

use crate::domain::{ArbitrationError, CombinedDecision, Configuration, SensorSnapshot};

/// Decider は 1 リクエスト分の入力から両アクチュエータの決定を生成
///
/// # 設計原則
/// - 純粋関数（同じ入力 → 同じ出力）
/// - 共有可変状態なし（`Send + Sync`、並列に呼び出せる）
/// - 入力検証は呼び出し側（`DecisionService`）の責務
pub trait Decider: Send + Sync {
    fn decide(
        &self,
        sensors: &SensorSnapshot,
        config: &Configuration,
    ) -> Result<CombinedDecision, ArbitrationError>;
}
