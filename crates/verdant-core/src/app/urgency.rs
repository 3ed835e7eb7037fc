//! Urgency tier: fixed safety thresholds that override everything else.
//!
//! The constants are fixed and not part of `Configuration`, so no
//! per-location threshold can disable them.

use crate::domain::{Actuator, ActuatorDecision, SensorSnapshot};

/// Below this soil moisture (percent) the pump runs urgently.
pub const CRITICAL_SOIL_MOISTURE: f64 = 10.0;

/// Above this temperature (°C) the fan runs urgently.
pub const CRITICAL_TEMPERATURE: f64 = 40.0;

/// Above this humidity (percent) the fan runs urgently.
pub const CRITICAL_HUMIDITY: f64 = 95.0;

/// At most one urgent decision fires per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgentDecision {
    Pump(ActuatorDecision),
    Fan(ActuatorDecision),
}

impl UrgentDecision {
    pub fn actuator(&self) -> Actuator {
        match self {
            Self::Pump(_) => Actuator::Pump,
            Self::Fan(_) => Actuator::Fan,
        }
    }

    pub fn decision(&self) -> ActuatorDecision {
        match self {
            Self::Pump(d) | Self::Fan(d) => *d,
        }
    }

    /// The decision for `actuator`, if this urgency is about it.
    pub fn for_actuator(&self, actuator: Actuator) -> Option<ActuatorDecision> {
        (self.actuator() == actuator).then(|| self.decision())
    }
}

/// Evaluate the safety thresholds.
///
/// Desiccation is checked first and returns immediately, so an urgent pump
/// and an urgent fan never fire together.
pub fn evaluate_urgency(sensors: &SensorSnapshot) -> Option<UrgentDecision> {
    if sensors.soil_moisture < CRITICAL_SOIL_MOISTURE {
        return Some(UrgentDecision::Pump(ActuatorDecision::urgent_on(Actuator::Pump)));
    }
    if sensors.temperature > CRITICAL_TEMPERATURE || sensors.humidity > CRITICAL_HUMIDITY {
        return Some(UrgentDecision::Fan(ActuatorDecision::urgent_on(Actuator::Fan)));
    }
    None
}
