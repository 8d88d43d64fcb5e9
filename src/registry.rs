use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{RegistryError, StructuredError};
use crate::types::{
    InstigationState, InstigationStatus, MutationResponse, Sensor, SensorSelector,
    StartSensorResult, StopSensorMutationResult, StopSensorResult,
};

struct SensorRecord {
    selector: SensorSelector,
    selector_id: String,
    status: InstigationStatus,
}

impl SensorRecord {
    fn state(&self) -> InstigationState {
        InstigationState {
            id: self.selector_id.clone(),
            status: self.status,
        }
    }
}

/// Registered sensors and their run state, keyed by job origin id.
#[derive(Default)]
pub struct SensorRegistry {
    sensors: DashMap<String, SensorRecord>,
    // SensorSelector -> job origin id
    by_selector: DashMap<SensorSelector, String>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions<I>(definitions: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = SensorSelector>,
    {
        let registry = Self::new();
        for selector in definitions {
            registry.register(selector)?;
        }
        Ok(registry)
    }

    /// Adds a stopped sensor and returns its job origin id.
    pub fn register(&self, selector: SensorSelector) -> Result<String, RegistryError> {
        let origin_id = Uuid::new_v4().to_string();
        // The record must exist before the selector resolves to it.
        self.sensors.insert(
            origin_id.clone(),
            SensorRecord {
                selector: selector.clone(),
                selector_id: Uuid::new_v4().to_string(),
                status: InstigationStatus::Stopped,
            },
        );
        match self.by_selector.entry(selector) {
            Entry::Occupied(slot) => {
                self.sensors.remove(&origin_id);
                Err(RegistryError::Duplicate(slot.key().to_string()))
            }
            Entry::Vacant(slot) => {
                slot.insert(origin_id.clone());
                Ok(origin_id)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Job origin id and current state for a selector.
    pub fn lookup(&self, selector: &SensorSelector) -> Option<(String, InstigationState)> {
        let origin_id = self.by_selector.get(selector)?.value().clone();
        let record = self.sensors.get(&origin_id)?;
        Some((origin_id, record.state()))
    }

    pub fn start_sensor(&self, selector: &SensorSelector) -> MutationResponse {
        let result = match self.try_start(selector) {
            Ok(sensor) => {
                info!(sensor = %selector.sensor_name, origin_id = %sensor.id, "sensor started");
                StartSensorResult::Sensor(sensor)
            }
            Err(err) => {
                warn!(error = %err, "start_sensor failed");
                StartSensorResult::Error(StructuredError::from(&err))
            }
        };
        MutationResponse::start(result)
    }

    pub fn stop_sensor(&self, origin_id: &str, selector_id: &str) -> MutationResponse {
        let result = match self.try_stop(origin_id, selector_id) {
            Ok(instigation_state) => {
                info!(origin_id, "sensor stopped");
                StopSensorResult::StopSensorMutationResult(StopSensorMutationResult {
                    instigation_state,
                })
            }
            Err(err) => {
                warn!(error = %err, "stop_sensor failed");
                StopSensorResult::Error(StructuredError::from(&err))
            }
        };
        MutationResponse::stop(result)
    }

    fn try_start(&self, selector: &SensorSelector) -> Result<Sensor, RegistryError> {
        let origin_id = self
            .by_selector
            .get(selector)
            .map(|r| r.value().clone())
            .ok_or_else(|| RegistryError::SensorNotFound(selector.clone()))?;
        let mut record = self
            .sensors
            .get_mut(&origin_id)
            .ok_or_else(|| RegistryError::SensorNotFound(selector.clone()))?;

        if record.status == InstigationStatus::Running {
            return Err(RegistryError::AlreadyRunning(selector.sensor_name.clone()));
        }
        record.status = InstigationStatus::Running;

        Ok(Sensor {
            id: origin_id,
            sensor_state: record.state(),
        })
    }

    fn try_stop(&self, origin_id: &str, selector_id: &str) -> Result<InstigationState, RegistryError> {
        let unknown = || RegistryError::UnknownInstigator {
            origin_id: origin_id.to_string(),
            selector_id: selector_id.to_string(),
        };
        let mut record = self.sensors.get_mut(origin_id).ok_or_else(unknown)?;
        if record.selector_id != selector_id {
            return Err(unknown());
        }
        if record.status == InstigationStatus::Stopped {
            info!(sensor = %record.selector.sensor_name, "sensor already stopped");
        }
        record.status = InstigationStatus::Stopped;
        Ok(record.state())
    }
}
