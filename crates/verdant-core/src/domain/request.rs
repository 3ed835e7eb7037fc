//! Decision request: what the request handler decodes from the transport.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::configuration::Configuration;
use super::errors::ValidationError;
use super::sensors::SensorSnapshot;

/// Physical location identifier, used to tag logs and errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Placeholder when a request is too malformed to name its location.
    pub fn unknown() -> Self {
        Self("<unknown>".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One decision request.
///
/// ```json
/// {
///   "locationId": "greenhouse-1",
///   "sensorData": { "soilMoisture": 40, "temperature": 25, "humidity": 50 },
///   "configuration": { "moistureThreshold": 50, "tempMax": 35, "humidityMax": 80 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub location_id: LocationId,
    pub sensor_data: SensorSnapshot,
    pub configuration: Configuration,
}

impl DecisionRequest {
    pub fn new(
        location_id: impl Into<LocationId>,
        sensor_data: SensorSnapshot,
        configuration: Configuration,
    ) -> Self {
        Self {
            location_id: location_id.into(),
            sensor_data,
            configuration,
        }
    }

    /// Check every field before any tier runs. The core never guesses a
    /// missing or unusable threshold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.location_id.is_empty() {
            return Err(ValidationError::EmptyLocationId);
        }
        self.sensor_data.validate()?;
        self.configuration.validate()?;
        Ok(())
    }
}
