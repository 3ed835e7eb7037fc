//! Domain model (sensors, configuration, decisions, requests, errors).
//!
//! I/O を一切持たない値型のみ。アービトレーションのロジックは `app` に置く。

pub mod configuration;
pub mod decision;
pub mod errors;
pub mod request;
pub mod sensors;

pub use self::configuration::Configuration;
pub use self::decision::{
    Action, Actuator, ActuatorDecision, CombinedDecision, Urgency, DEFAULT_FAN_DURATION_SECS,
    DEFAULT_PUMP_DURATION_SECS, URGENT_DURATION_SECS,
};
pub use self::errors::{ArbitrationError, DecisionError, DecisionErrorKind, ValidationError};
pub use self::request::{DecisionRequest, LocationId};
pub use self::sensors::{FEATURE_COUNT, SensorSnapshot};
