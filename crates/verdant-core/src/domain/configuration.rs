//! Per-location thresholds, supplied fresh with every request.

use serde::{Deserialize, Serialize};

use super::decision::{DEFAULT_FAN_DURATION_SECS, DEFAULT_PUMP_DURATION_SECS};
use super::errors::ValidationError;

/// User-configured thresholds for one location.
///
/// `moisture_threshold` is compared against the rule tier's processed soil
/// moisture (see `app::pump::MoistureScale`). Durations are seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub moisture_threshold: f64,

    /// Sent by the backend alongside `tempMax`; not used for arbitration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_min: Option<f64>,

    pub temp_max: f64,
    pub humidity_max: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pump_duration: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fan_duration: Option<u32>,
}

impl Configuration {
    /// Thresholds only; durations fall back to their defaults.
    pub fn new(moisture_threshold: f64, temp_max: f64, humidity_max: f64) -> Self {
        Self {
            moisture_threshold,
            temp_min: None,
            temp_max,
            humidity_max,
            pump_duration: None,
            fan_duration: None,
        }
    }

    pub fn with_pump_duration(mut self, secs: u32) -> Self {
        self.pump_duration = Some(secs);
        self
    }

    pub fn with_fan_duration(mut self, secs: u32) -> Self {
        self.fan_duration = Some(secs);
        self
    }

    pub fn pump_duration_secs(&self) -> u32 {
        self.pump_duration.unwrap_or(DEFAULT_PUMP_DURATION_SECS)
    }

    pub fn fan_duration_secs(&self) -> u32 {
        self.fan_duration.unwrap_or(DEFAULT_FAN_DURATION_SECS)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_finite("configuration.moistureThreshold", self.moisture_threshold)?;
        if let Some(temp_min) = self.temp_min {
            ValidationError::check_finite("configuration.tempMin", temp_min)?;
        }
        ValidationError::check_finite("configuration.tempMax", self.temp_max)?;
        ValidationError::check_finite("configuration.humidityMax", self.humidity_max)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_default_to_300_seconds() {
        let c = Configuration::new(50.0, 35.0, 80.0);
        assert_eq!(c.pump_duration_secs(), 300);
        assert_eq!(c.fan_duration_secs(), 300);
    }

    #[test]
    fn explicit_durations_win() {
        let c = Configuration::new(50.0, 35.0, 80.0)
            .with_pump_duration(45)
            .with_fan_duration(90);
        assert_eq!(c.pump_duration_secs(), 45);
        assert_eq!(c.fan_duration_secs(), 90);
    }

    #[test]
    fn decodes_backend_payload_with_temp_min() {
        let json = r#"{
            "moistureThreshold": 50,
            "tempMin": 12.5,
            "tempMax": 35,
            "humidityMax": 80
        }"#;
        let c: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(c.temp_min, Some(12.5));
        assert_eq!(c.pump_duration, None);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn missing_threshold_fails_to_decode() {
        let json = r#"{ "tempMax": 35, "humidityMax": 80 }"#;
        assert!(serde_json::from_str::<Configuration>(json).is_err());
    }

    #[test]
    fn negative_duration_fails_to_decode() {
        let json = r#"{ "moistureThreshold": 50, "tempMax": 35, "humidityMax": 80, "pumpDuration": -5 }"#;
        assert!(serde_json::from_str::<Configuration>(json).is_err());
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        let mut c = Configuration::new(50.0, 35.0, 80.0);
        c.temp_min = Some(f64::NAN);
        let err = c.validate().unwrap_err();
        assert_eq!(err.field(), Some("configuration.tempMin"));
    }
}
