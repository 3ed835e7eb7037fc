//! Decision model: what each actuator should do after one arbitration call.
//!
//! `ActuatorDecision` is a value type whose constructors are the only way to
//! build one, so the invariants (urgent ⇒ 600s, off ⇒ 0s, ...) hold for every
//! decision the arbiter produces. `CombinedDecision` pairs the pump and fan
//! slots and is serialized flat, as the upstream backend expects.

use serde::{Deserialize, Serialize};

use super::errors::ArbitrationError;

/// Fixed run time for any urgent actuation.
pub const URGENT_DURATION_SECS: u32 = 600;

/// Pump run time when the configuration does not set `pumpDuration`.
pub const DEFAULT_PUMP_DURATION_SECS: u32 = 300;

/// Fan run time when the configuration does not set `fanDuration`.
pub const DEFAULT_FAN_DURATION_SECS: u32 = 300;

/// The two independently decided actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Actuator {
    Pump,
    Fan,
}

/// Wire-level action names.
///
/// Serialized as SCREAMING_SNAKE_CASE: PUMP_ON / PUMP_OFF / FAN_ON / FAN_OFF / NONE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    PumpOn,
    PumpOff,
    FanOn,
    FanOff,
    /// Legacy "do nothing"; accepted on either slot as OFF.
    None,
}

impl Action {
    pub fn on(actuator: Actuator) -> Self {
        match actuator {
            Actuator::Pump => Action::PumpOn,
            Actuator::Fan => Action::FanOn,
        }
    }

    pub fn off(actuator: Actuator) -> Self {
        match actuator {
            Actuator::Pump => Action::PumpOff,
            Actuator::Fan => Action::FanOff,
        }
    }

    /// The actuator this action drives, `None` for [`Action::None`].
    pub fn actuator(self) -> Option<Actuator> {
        match self {
            Action::PumpOn | Action::PumpOff => Some(Actuator::Pump),
            Action::FanOn | Action::FanOff => Some(Actuator::Fan),
            Action::None => None,
        }
    }

    pub fn is_on(self) -> bool {
        matches!(self, Action::PumpOn | Action::FanOn)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    #[default]
    Normal,
    Urgent,
}

/// One actuator's decision.
///
/// Immutable once produced. Use the constructors; fields are private so that
/// an OFF decision can never carry a duration and an urgent one always runs
/// for [`URGENT_DURATION_SECS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActuatorDecision {
    action: Action,
    duration_seconds: u32,
    urgency: Urgency,
}

impl ActuatorDecision {
    /// Safety override: ON for the fixed urgent duration.
    pub fn urgent_on(actuator: Actuator) -> Self {
        Self {
            action: Action::on(actuator),
            duration_seconds: URGENT_DURATION_SECS,
            urgency: Urgency::Urgent,
        }
    }

    /// Regular ON decision from the learned or rule tier.
    pub fn on(actuator: Actuator, duration_seconds: u32) -> Self {
        Self {
            action: Action::on(actuator),
            duration_seconds,
            urgency: Urgency::Normal,
        }
    }

    /// Base state of every slot.
    pub fn off(actuator: Actuator) -> Self {
        Self {
            action: Action::off(actuator),
            duration_seconds: 0,
            urgency: Urgency::Normal,
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn is_on(&self) -> bool {
        self.action.is_on()
    }

    pub fn is_urgent(&self) -> bool {
        self.urgency == Urgency::Urgent
    }

    /// Rebuild a decision from wire fields, rejecting combinations the
    /// constructors above could never produce.
    pub fn from_parts(
        action: Action,
        duration_seconds: u32,
        urgency: Urgency,
    ) -> Result<Self, ArbitrationError> {
        let decision = Self {
            action,
            duration_seconds,
            urgency,
        };
        decision.check_invariants()?;
        Ok(decision)
    }

    fn check_invariants(&self) -> Result<(), ArbitrationError> {
        if !self.action.is_on() && self.duration_seconds != 0 {
            return Err(ArbitrationError::BrokenInvariant {
                action: self.action,
                detail: "inactive decision must carry a zero duration",
            });
        }
        if !self.action.is_on() && self.urgency == Urgency::Urgent {
            return Err(ArbitrationError::BrokenInvariant {
                action: self.action,
                detail: "inactive decision cannot be urgent",
            });
        }
        if self.urgency == Urgency::Urgent && self.duration_seconds != URGENT_DURATION_SECS {
            return Err(ArbitrationError::BrokenInvariant {
                action: self.action,
                detail: "urgent decision must run for the fixed urgent duration",
            });
        }
        Ok(())
    }

    fn check_slot(&self, slot: Actuator) -> Result<(), ArbitrationError> {
        match self.action.actuator() {
            Some(actuator) if actuator != slot => Err(ArbitrationError::MisroutedAction {
                slot,
                action: self.action,
            }),
            _ => self.check_invariants(),
        }
    }
}

/// Sole output of one arbitration call: one decision per actuator.
///
/// Serialized flat (`pump_action`, `pump_duration`, ..., `fan_urgency`).
/// Deserialization goes through [`CombinedDecision::assemble`], so a decoded
/// value satisfies the same invariants as a freshly arbitrated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "FlatDecision", try_from = "FlatDecision")]
pub struct CombinedDecision {
    pump: ActuatorDecision,
    fan: ActuatorDecision,
}

impl CombinedDecision {
    /// Pair the two slots, verifying each decision belongs to its actuator.
    pub fn assemble(
        pump: ActuatorDecision,
        fan: ActuatorDecision,
    ) -> Result<Self, ArbitrationError> {
        pump.check_slot(Actuator::Pump)?;
        fan.check_slot(Actuator::Fan)?;
        Ok(Self { pump, fan })
    }

    pub fn pump(&self) -> ActuatorDecision {
        self.pump
    }

    pub fn fan(&self) -> ActuatorDecision {
        self.fan
    }
}

impl Default for CombinedDecision {
    fn default() -> Self {
        Self {
            pump: ActuatorDecision::off(Actuator::Pump),
            fan: ActuatorDecision::off(Actuator::Fan),
        }
    }
}

/// Flat wire shape of [`CombinedDecision`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct FlatDecision {
    pump_action: Action,
    pump_duration: u32,
    pump_urgency: Urgency,
    fan_action: Action,
    fan_duration: u32,
    fan_urgency: Urgency,
}

impl From<CombinedDecision> for FlatDecision {
    fn from(d: CombinedDecision) -> Self {
        Self {
            pump_action: d.pump.action,
            pump_duration: d.pump.duration_seconds,
            pump_urgency: d.pump.urgency,
            fan_action: d.fan.action,
            fan_duration: d.fan.duration_seconds,
            fan_urgency: d.fan.urgency,
        }
    }
}

impl TryFrom<FlatDecision> for CombinedDecision {
    type Error = ArbitrationError;

    fn try_from(flat: FlatDecision) -> Result<Self, Self::Error> {
        let pump = ActuatorDecision::from_parts(flat.pump_action, flat.pump_duration, flat.pump_urgency)?;
        let fan = ActuatorDecision::from_parts(flat.fan_action, flat.fan_duration, flat.fan_urgency)?;
        CombinedDecision::assemble(pump, fan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Action::PumpOn, "\"PUMP_ON\"")]
    #[case(Action::PumpOff, "\"PUMP_OFF\"")]
    #[case(Action::FanOn, "\"FAN_ON\"")]
    #[case(Action::FanOff, "\"FAN_OFF\"")]
    #[case(Action::None, "\"NONE\"")]
    fn action_serializes_as_wire_names(#[case] action: Action, #[case] expected: &str) {
        assert_eq!(serde_json::to_string(&action).unwrap(), expected);
    }

    #[test]
    fn urgency_serializes_as_wire_names() {
        assert_eq!(serde_json::to_string(&Urgency::Urgent).unwrap(), "\"URGENT\"");
        assert_eq!(serde_json::to_string(&Urgency::Normal).unwrap(), "\"NORMAL\"");
    }

    #[test]
    fn constructors_uphold_invariants() {
        let urgent = ActuatorDecision::urgent_on(Actuator::Pump);
        assert_eq!(urgent.action(), Action::PumpOn);
        assert_eq!(urgent.duration_seconds(), URGENT_DURATION_SECS);
        assert!(urgent.is_urgent());

        let off = ActuatorDecision::off(Actuator::Fan);
        assert_eq!(off.action(), Action::FanOff);
        assert_eq!(off.duration_seconds(), 0);
        assert_eq!(off.urgency(), Urgency::Normal);

        let on = ActuatorDecision::on(Actuator::Fan, 120);
        assert_eq!(on.duration_seconds(), 120);
        assert_eq!(on.urgency(), Urgency::Normal);
    }

    #[test]
    fn combined_decision_serializes_flat() {
        let d = CombinedDecision::assemble(
            ActuatorDecision::urgent_on(Actuator::Pump),
            ActuatorDecision::off(Actuator::Fan),
        )
        .unwrap();

        let v = serde_json::to_value(d).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "pump_action": "PUMP_ON",
                "pump_duration": 600,
                "pump_urgency": "URGENT",
                "fan_action": "FAN_OFF",
                "fan_duration": 0,
                "fan_urgency": "NORMAL",
            })
        );
    }

    #[test]
    fn default_is_everything_off() {
        let d = CombinedDecision::default();
        assert_eq!(d.pump(), ActuatorDecision::off(Actuator::Pump));
        assert_eq!(d.fan(), ActuatorDecision::off(Actuator::Fan));
    }

    #[test]
    fn assemble_rejects_swapped_slots() {
        let err = CombinedDecision::assemble(
            ActuatorDecision::off(Actuator::Fan),
            ActuatorDecision::off(Actuator::Pump),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ArbitrationError::MisroutedAction {
                slot: Actuator::Pump,
                action: Action::FanOff,
            }
        );
    }

    #[rstest]
    #[case::off_with_duration(Action::PumpOff, 30, Urgency::Normal)]
    #[case::urgent_off(Action::PumpOff, 0, Urgency::Urgent)]
    #[case::urgent_short(Action::PumpOn, 300, Urgency::Urgent)]
    #[case::none_with_duration(Action::None, 5, Urgency::Normal)]
    fn from_parts_rejects_broken_invariants(
        #[case] action: Action,
        #[case] duration: u32,
        #[case] urgency: Urgency,
    ) {
        let result = ActuatorDecision::from_parts(action, duration, urgency);
        assert!(matches!(result, Err(ArbitrationError::BrokenInvariant { .. })));
    }

    #[test]
    fn legacy_none_is_accepted_as_off_on_the_fan_slot() {
        let json = r#"{
            "pump_action": "PUMP_OFF", "pump_duration": 0, "pump_urgency": "NORMAL",
            "fan_action": "NONE", "fan_duration": 0, "fan_urgency": "NORMAL"
        }"#;
        let d: CombinedDecision = serde_json::from_str(json).unwrap();
        assert_eq!(d.fan().action(), Action::None);
        assert!(!d.fan().is_on());
    }

    #[test]
    fn decoding_rejects_misrouted_action() {
        let json = r#"{
            "pump_action": "FAN_ON", "pump_duration": 300, "pump_urgency": "NORMAL",
            "fan_action": "FAN_OFF", "fan_duration": 0, "fan_urgency": "NORMAL"
        }"#;
        assert!(serde_json::from_str::<CombinedDecision>(json).is_err());
    }
}
