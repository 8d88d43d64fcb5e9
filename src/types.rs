use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StructuredError;

/// Addresses a sensor by where it is defined.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct SensorSelector {
    pub repository_location_name: String,
    pub repository_name: String,
    pub sensor_name: String,
}

impl SensorSelector {
    pub fn new(
        repository_location_name: impl Into<String>,
        repository_name: impl Into<String>,
        sensor_name: impl Into<String>,
    ) -> Self {
        Self {
            repository_location_name: repository_location_name.into(),
            repository_name: repository_name.into(),
            sensor_name: sensor_name.into(),
        }
    }
}

impl fmt::Display for SensorSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in repository {}@{}",
            self.sensor_name, self.repository_name, self.repository_location_name
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstigationStatus {
    Running,
    Stopped,
}

impl fmt::Display for InstigationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstigationStatus::Running => f.write_str("RUNNING"),
            InstigationStatus::Stopped => f.write_str("STOPPED"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InstigationState {
    pub id: String,
    pub status: InstigationStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub id: String,
    pub sensor_state: InstigationState,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StopSensorMutationResult {
    pub instigation_state: InstigationState,
}

/// Result of the `startSensor` mutation, discriminated by `kind`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum StartSensorResult {
    Sensor(Sensor),
    Error(StructuredError),
}

/// Result of the `stopSensor` mutation, discriminated by `kind`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum StopSensorResult {
    StopSensorMutationResult(StopSensorMutationResult),
    Error(StructuredError),
}

/// Implemented by every per-operation result so the extractor can treat
/// them uniformly.
pub trait MutationOutcome {
    fn error(&self) -> Option<&StructuredError>;
}

impl MutationOutcome for StartSensorResult {
    fn error(&self) -> Option<&StructuredError> {
        match self {
            StartSensorResult::Sensor(_) => None,
            StartSensorResult::Error(err) => Some(err),
        }
    }
}

impl MutationOutcome for StopSensorResult {
    fn error(&self) -> Option<&StructuredError> {
        match self {
            StopSensorResult::StopSensorMutationResult(_) => None,
            StopSensorResult::Error(err) => Some(err),
        }
    }
}

/// Response body of a mutation call. A well-formed response populates
/// exactly one field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_sensor: Option<StartSensorResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sensor: Option<StopSensorResult>,
}

impl MutationResponse {
    pub fn start(result: StartSensorResult) -> Self {
        Self {
            start_sensor: Some(result),
            ..Default::default()
        }
    }

    pub fn stop(result: StopSensorResult) -> Self {
        Self {
            stop_sensor: Some(result),
            ..Default::default()
        }
    }

    /// Populated operation fields in a fixed order: `startSensor`, then `stopSensor`.
    pub fn outcomes(&self) -> impl Iterator<Item = &dyn MutationOutcome> {
        let start = self.start_sensor.as_ref().map(|r| r as &dyn MutationOutcome);
        let stop = self.stop_sensor.as_ref().map(|r| r as &dyn MutationOutcome);
        start.into_iter().chain(stop)
    }

    pub fn is_empty(&self) -> bool {
        self.start_sensor.is_none() && self.stop_sensor.is_none()
    }
}
