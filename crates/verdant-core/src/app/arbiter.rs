//! Arbiter: combines the urgency, learned and rule tiers into one
//! `CombinedDecision`.
//!
//! Priority per slot:
//! - pump: urgent pump → classifier ON → pump rules
//! - fan:  urgent fan → fan rules

use crate::domain::{Actuator, ArbitrationError, CombinedDecision, Configuration, SensorSnapshot};
use crate::ports::{ClassifierHandle, Decider};

use super::fan::decide_fan_by_rules;
use super::pump::{MoistureScale, decide_pump};
use super::urgency::evaluate_urgency;

/// Stateless decision arbiter.
///
/// Holds only the immutable classifier handle built at startup and the rule
/// tier's moisture convention; cloning is cheap and every call is
/// independent.
#[derive(Debug, Clone, Default)]
pub struct Arbiter {
    classifier: ClassifierHandle,
    moisture_scale: MoistureScale,
}

impl Arbiter {
    pub fn new(classifier: ClassifierHandle, moisture_scale: MoistureScale) -> Self {
        Self {
            classifier,
            moisture_scale,
        }
    }

    pub fn arbitrate(
        &self,
        sensors: &SensorSnapshot,
        config: &Configuration,
    ) -> Result<CombinedDecision, ArbitrationError> {
        let urgent = evaluate_urgency(sensors);

        let pump = urgent
            .and_then(|u| u.for_actuator(Actuator::Pump))
            .unwrap_or_else(|| decide_pump(sensors, config, &self.classifier, self.moisture_scale));

        let fan = urgent
            .and_then(|u| u.for_actuator(Actuator::Fan))
            .unwrap_or_else(|| decide_fan_by_rules(sensors, config));

        CombinedDecision::assemble(pump, fan)
    }
}

impl Decider for Arbiter {
    fn decide(
        &self,
        sensors: &SensorSnapshot,
        config: &Configuration,
    ) -> Result<CombinedDecision, ArbitrationError> {
        self.arbitrate(sensors, config)
    }
}

/// One-shot arbitration with the default (raw) moisture convention.
pub fn arbitrate(
    sensors: &SensorSnapshot,
    config: &Configuration,
    classifier: &ClassifierHandle,
) -> Result<CombinedDecision, ArbitrationError> {
    Arbiter::new(classifier.clone(), MoistureScale::Raw).arbitrate(sensors, config)
}
