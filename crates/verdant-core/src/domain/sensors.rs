//! Sensor snapshot: one reading of the three environment sensors.

use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

/// Number of features the pump classifier consumes.
pub const FEATURE_COUNT: usize = 3;

/// Soil moisture, air temperature and relative humidity at request time.
///
/// Percentages are on a 0–100 scale, temperature in °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSnapshot {
    pub soil_moisture: f64,
    pub temperature: f64,
    pub humidity: f64,
}

impl SensorSnapshot {
    pub fn new(soil_moisture: f64, temperature: f64, humidity: f64) -> Self {
        Self {
            soil_moisture,
            temperature,
            humidity,
        }
    }

    /// Raw, unscaled feature vector in training column order:
    /// `[soil_moisture, temperature, humidity]`.
    pub fn pump_features(&self) -> [f64; FEATURE_COUNT] {
        [self.soil_moisture, self.temperature, self.humidity]
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_percent("sensorData.soilMoisture", self.soil_moisture)?;
        ValidationError::check_finite("sensorData.temperature", self.temperature)?;
        ValidationError::check_percent("sensorData.humidity", self.humidity)?;
        Ok(())
    }
}
