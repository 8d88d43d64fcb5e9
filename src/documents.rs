//! GraphQL documents for the sensor mutations.

/// Selection shared by every mutation that can fail with a structured error.
pub const STRUCTURED_ERROR_FRAGMENT: &str = r#"
fragment StructuredErrorFragment on Error {
  message
  stack
  cause {
    message
    stack
  }
}
"#;

pub const START_SENSOR_MUTATION: &str = r#"
mutation StartSensor($sensorSelector: SensorSelector!) {
  startSensor(sensorSelector: $sensorSelector) {
    kind
    ... on Sensor {
      id
      sensorState {
        id
        status
      }
    }
    ...StructuredErrorFragment
  }
}
"#;

pub const STOP_SENSOR_MUTATION: &str = r#"
mutation StopRunningSensor($jobOriginId: String!, $jobSelectorId: String!) {
  stopSensor(jobOriginId: $jobOriginId, jobSelectorId: $jobSelectorId) {
    kind
    ... on StopSensorMutationResult {
      instigationState {
        id
        status
      }
    }
    ...StructuredErrorFragment
  }
}
"#;

/// Name of the operation declared by a mutation document, e.g. `StartSensor`.
pub fn operation_name(document: &str) -> Option<&str> {
    let rest = document.trim_start().strip_prefix("mutation")?.trim_start();
    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}
