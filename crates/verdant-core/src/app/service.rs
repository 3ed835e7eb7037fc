//! DecisionService - リクエスト単位の入口
//!
//! 検証 → アービトレーション → ロケーション ID 付きのエラー変換を行う。
//! トランスポート（HTTP, stdin など）には依存しない。

use std::sync::Arc;

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::domain::{
    CombinedDecision, DecisionError, DecisionRequest, LocationId, ValidationError,
};
use crate::ports::Decider;

/// DecisionService は 1 リクエストを 1 つの CombinedDecision に変換
///
/// # 使用例
/// ```ignore
/// let service = DecisionService::new(Arc::new(Arbiter::default()));
/// let decision = service.decide(&request)?;
/// ```
#[derive(Clone)]
pub struct DecisionService {
    decider: Arc<dyn Decider>,
}

impl DecisionService {
    pub fn new(decider: Arc<dyn Decider>) -> Self {
        Self { decider }
    }

    /// Validate and arbitrate one decoded request.
    pub fn decide(&self, request: &DecisionRequest) -> Result<CombinedDecision, DecisionError> {
        let location = &request.location_id;
        info!("decision requested for location {location}");
        debug!("sensor data for {location}: {:?}", request.sensor_data);
        debug!("configuration for {location}: {:?}", request.configuration);

        if let Err(e) = request.validate() {
            warn!("rejecting request for location {location}: {e}");
            return Err(DecisionError::new(location.clone(), e));
        }

        match self.decider.decide(&request.sensor_data, &request.configuration) {
            Ok(decision) => {
                info!(
                    "decision for location {location}: pump={:?}/{}s/{:?} fan={:?}/{}s/{:?}",
                    decision.pump().action(),
                    decision.pump().duration_seconds(),
                    decision.pump().urgency(),
                    decision.fan().action(),
                    decision.fan().duration_seconds(),
                    decision.fan().urgency(),
                );
                Ok(decision)
            }
            Err(e) => {
                error!("arbitration failed for location {location}: {e}");
                Err(DecisionError::new(location.clone(), e))
            }
        }
    }

    /// Decode a JSON request body, then [`decide`](Self::decide).
    ///
    /// Missing or non-numeric fields are validation errors. The location id
    /// is recovered from the raw body when possible so the error still names
    /// the site.
    pub fn decide_json(&self, body: &[u8]) -> Result<CombinedDecision, DecisionError> {
        let raw: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
            warn!("undecodable request body: {e}");
            DecisionError::new(LocationId::unknown(), ValidationError::Malformed(e.to_string()))
        })?;

        let location = raw
            .get("locationId")
            .and_then(serde_json::Value::as_str)
            .map(LocationId::from)
            .unwrap_or_else(LocationId::unknown);

        let request: DecisionRequest = serde_json::from_value(raw).map_err(|e| {
            warn!("malformed request for location {location}: {e}");
            DecisionError::new(location.clone(), ValidationError::Malformed(e.to_string()))
        })?;

        self.decide(&request)
    }
}

/// Wire shape of a failed decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status: u16,
    pub location_id: String,
    pub detail: String,
}

impl From<&DecisionError> for ErrorResponse {
    fn from(e: &DecisionError) -> Self {
        Self {
            status: e.status_code(),
            location_id: e.location_id.to_string(),
            detail: e.to_string(),
        }
    }
}
