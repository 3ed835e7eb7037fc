//! Pump arbitration: learned tier first, rule tier as fallback.
//!
//! The classifier is only a fast path to ON. A `0` prediction, an absent
//! classifier, an inference fault or a panic inside the classifier all end
//! up in the rule tier.

use std::panic::{AssertUnwindSafe, catch_unwind};

use log::{debug, warn};

use crate::domain::{Actuator, ActuatorDecision, Configuration, SensorSnapshot};
use crate::ports::{ClassifierHandle, PumpPrediction};

/// Rule-tier temperature margin below `tempMax` (°C).
pub const TEMP_SAFETY_MARGIN: f64 = 2.0;

/// How the rule tier scales raw soil moisture before comparing it with
/// `moistureThreshold`.
///
/// Deployments disagree on the scale `moistureThreshold` is authored in.
/// `Raw` compares percent against percent; `DividedBy(10.0)` reproduces
/// thresholds written against moisture / 10.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MoistureScale {
    #[default]
    Raw,
    DividedBy(f64),
}

impl MoistureScale {
    /// `None` unless the divisor is finite and positive.
    pub fn divided_by(divisor: f64) -> Option<Self> {
        (divisor.is_finite() && divisor > 0.0).then_some(Self::DividedBy(divisor))
    }

    pub fn apply(self, raw_moisture: f64) -> f64 {
        match self {
            Self::Raw => raw_moisture,
            Self::DividedBy(divisor) => raw_moisture / divisor,
        }
    }
}

/// What the learned tier tells the arbiter to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnedOutcome {
    UseClassifier(ActuatorDecision),
    FallThroughToRules,
}

/// Consult the classifier, if any, on raw readings.
pub fn consult_classifier(
    sensors: &SensorSnapshot,
    config: &Configuration,
    classifier: &ClassifierHandle,
) -> LearnedOutcome {
    let Some(classifier) = classifier.as_classifier() else {
        return LearnedOutcome::FallThroughToRules;
    };

    let features = sensors.pump_features();
    // The handle is shared read-only, so nothing is left half-updated.
    let Ok(prediction) = catch_unwind(AssertUnwindSafe(|| classifier.predict(&features))) else {
        warn!("pump classifier panicked for this request, using rule tier");
        return LearnedOutcome::FallThroughToRules;
    };

    match prediction {
        Ok(PumpPrediction::On) => {
            LearnedOutcome::UseClassifier(ActuatorDecision::on(Actuator::Pump, config.pump_duration_secs()))
        }
        Ok(PumpPrediction::Off) => {
            debug!("classifier predicted pump off; deferring to rule tier");
            LearnedOutcome::FallThroughToRules
        }
        Err(e) => {
            warn!("pump classifier unavailable for this request, using rule tier: {e}");
            LearnedOutcome::FallThroughToRules
        }
    }
}

/// Rule tier: dry enough AND at least [`TEMP_SAFETY_MARGIN`] below `tempMax`.
///
/// Both comparisons are strict; the threshold value itself yields OFF.
pub fn decide_pump_by_rules(
    sensors: &SensorSnapshot,
    config: &Configuration,
    scale: MoistureScale,
) -> ActuatorDecision {
    let moisture = scale.apply(sensors.soil_moisture);
    let dry = moisture < config.moisture_threshold;
    let cool_enough = sensors.temperature < config.temp_max - TEMP_SAFETY_MARGIN;

    if dry && cool_enough {
        ActuatorDecision::on(Actuator::Pump, config.pump_duration_secs())
    } else {
        ActuatorDecision::off(Actuator::Pump)
    }
}

/// Pump decision when the urgency tier did not already decide the pump.
pub fn decide_pump(
    sensors: &SensorSnapshot,
    config: &Configuration,
    classifier: &ClassifierHandle,
    scale: MoistureScale,
) -> ActuatorDecision {
    match consult_classifier(sensors, config, classifier) {
        LearnedOutcome::UseClassifier(decision) => decision,
        LearnedOutcome::FallThroughToRules => decide_pump_by_rules(sensors, config, scale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Action, Urgency};
    use crate::impls::{FailingClassifier, FixedClassifier};
    use crate::ports::{InferenceError, PumpClassifier};
    use rstest::rstest;

    fn config() -> Configuration {
        Configuration::new(50.0, 35.0, 80.0)
    }

    struct PanickingClassifier;

    impl PumpClassifier for PanickingClassifier {
        fn predict(&self, _features: &[f64]) -> Result<PumpPrediction, InferenceError> {
            panic!("classifier backend blew up");
        }
    }

    #[test]
    fn classifier_panic_falls_through_to_rules() {
        let sensors = SensorSnapshot::new(30.0, 20.0, 40.0);
        let handle = ClassifierHandle::present(PanickingClassifier);

        assert_eq!(
            consult_classifier(&sensors, &config(), &handle),
            LearnedOutcome::FallThroughToRules
        );
        let d = decide_pump(&sensors, &config(), &handle, MoistureScale::Raw);
        assert_eq!(d, ActuatorDecision::on(Actuator::Pump, 300));
    }

    #[test]
    fn classifier_on_short_circuits_rules() {
        // Wet soil: rules alone would say OFF.
        let sensors = SensorSnapshot::new(60.0, 20.0, 40.0);
        let handle = ClassifierHandle::present(FixedClassifier::new(PumpPrediction::On));

        let d = decide_pump(&sensors, &config(), &handle, MoistureScale::Raw);
        assert_eq!(d.action(), Action::PumpOn);
        assert_eq!(d.duration_seconds(), 300);
        assert_eq!(d.urgency(), Urgency::Normal);
    }

    #[test]
    fn classifier_off_still_lets_rules_turn_pump_on() {
        let sensors = SensorSnapshot::new(30.0, 20.0, 40.0);
        let handle = ClassifierHandle::present(FixedClassifier::new(PumpPrediction::Off));

        let d = decide_pump(&sensors, &config(), &handle, MoistureScale::Raw);
        assert_eq!(d.action(), Action::PumpOn);
    }

    #[test]
    fn inference_fault_falls_through_to_rules() {
        let sensors = SensorSnapshot::new(30.0, 20.0, 40.0);
        let handle = ClassifierHandle::present(FailingClassifier::new(
            InferenceError::Backend("model exploded".into()),
        ));

        assert_eq!(
            consult_classifier(&sensors, &config(), &handle),
            LearnedOutcome::FallThroughToRules
        );
        let d = decide_pump(&sensors, &config(), &handle, MoistureScale::Raw);
        assert_eq!(d.action(), Action::PumpOn);
    }

    #[test]
    fn classifier_sees_raw_readings() {
        let sensors = SensorSnapshot::new(33.0, 21.0, 44.0);
        let classifier = FixedClassifier::new(PumpPrediction::Off);
        let handle = ClassifierHandle::present(classifier.clone());

        consult_classifier(&sensors, &config(), &handle);
        assert_eq!(classifier.last_features(), Some(vec![33.0, 21.0, 44.0]));
    }

    #[test]
    fn classifier_on_uses_configured_pump_duration() {
        let sensors = SensorSnapshot::new(60.0, 20.0, 40.0);
        let handle = ClassifierHandle::present(FixedClassifier::new(PumpPrediction::On));

        let d = decide_pump(&sensors, &config().with_pump_duration(42), &handle, MoistureScale::Raw);
        assert_eq!(d.duration_seconds(), 42);
    }

    #[rstest]
    #[case::wet(SensorSnapshot::new(70.0, 20.0, 40.0))]
    #[case::at_threshold(SensorSnapshot::new(50.0, 20.0, 40.0))]
    #[case::too_warm(SensorSnapshot::new(30.0, 34.0, 40.0))]
    #[case::at_margin(SensorSnapshot::new(30.0, 33.0, 40.0))]
    fn rules_keep_pump_off(#[case] sensors: SensorSnapshot) {
        let d = decide_pump_by_rules(&sensors, &config(), MoistureScale::Raw);
        assert_eq!(d, ActuatorDecision::off(Actuator::Pump));
    }

    #[test]
    fn rules_turn_pump_on_when_dry_and_cool() {
        let d = decide_pump_by_rules(&SensorSnapshot::new(49.9, 32.9, 40.0), &config(), MoistureScale::Raw);
        assert_eq!(d, ActuatorDecision::on(Actuator::Pump, 300));
    }

    #[test]
    fn rules_use_configured_pump_duration() {
        let d = decide_pump_by_rules(
            &SensorSnapshot::new(30.0, 20.0, 40.0),
            &config().with_pump_duration(45),
            MoistureScale::Raw,
        );
        assert_eq!(d, ActuatorDecision::on(Actuator::Pump, 45));
    }

    #[test]
    fn divided_scale_compares_against_scaled_threshold() {
        // 45% / 10 = 4.5 < 5.0
        let cfg = Configuration::new(5.0, 35.0, 80.0);
        let scale = MoistureScale::divided_by(10.0).unwrap();
        let sensors = SensorSnapshot::new(45.0, 20.0, 40.0);

        assert!(decide_pump_by_rules(&sensors, &cfg, scale).is_on());
        assert!(!decide_pump_by_rules(&sensors, &cfg, MoistureScale::Raw).is_on());
    }

    #[rstest]
    #[case(0.0)]
    #[case(-10.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn divisor_must_be_positive_and_finite(#[case] divisor: f64) {
        assert_eq!(MoistureScale::divided_by(divisor), None);
    }
}
