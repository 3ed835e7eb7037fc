//! Fan rule tier. The fan never consults the classifier.

use crate::domain::{Actuator, ActuatorDecision, Configuration, SensorSnapshot};

/// Fan ON when either configured ceiling is exceeded, otherwise OFF.
pub fn decide_fan_by_rules(sensors: &SensorSnapshot, config: &Configuration) -> ActuatorDecision {
    if sensors.temperature > config.temp_max || sensors.humidity > config.humidity_max {
        ActuatorDecision::on(Actuator::Fan, config.fan_duration_secs())
    } else {
        ActuatorDecision::off(Actuator::Fan)
    }
}
