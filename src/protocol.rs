use serde::{Deserialize, Serialize};

use crate::documents::{START_SENSOR_MUTATION, STOP_SENSOR_MUTATION};
use crate::types::{MutationResponse, SensorSelector};

/// One request line sent to the agent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "operation")]
pub enum MutationRequest {
    #[serde(rename_all = "camelCase")]
    StartSensor { sensor_selector: SensorSelector },
    #[serde(rename_all = "camelCase")]
    StopRunningSensor {
        job_origin_id: String,
        job_selector_id: String,
    },
}

impl MutationRequest {
    /// The GraphQL document this request executes.
    pub fn document(&self) -> &'static str {
        match self {
            MutationRequest::StartSensor { .. } => START_SENSOR_MUTATION,
            MutationRequest::StopRunningSensor { .. } => STOP_SENSOR_MUTATION,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransportErrorMessage {
    pub message: String,
}

/// One response line written by the agent.
///
/// `errors` reports requests that could not be executed at all; domain
/// failures travel inside `data`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AgentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<MutationResponse>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<TransportErrorMessage>,
}

impl AgentResponse {
    pub fn data(data: MutationResponse) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            data: None,
            errors: vec![TransportErrorMessage {
                message: message.into(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::documents::operation_name;

    #[test]
    fn start_request_wire_shape() {
        let req = MutationRequest::StartSensor {
            sensor_selector: SensorSelector::new("loc", "repo", "tick"),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "operation": "StartSensor",
                "sensorSelector": {
                    "repositoryLocationName": "loc",
                    "repositoryName": "repo",
                    "sensorName": "tick"
                }
            })
        );
    }

    #[test]
    fn stop_request_decodes() {
        let req: MutationRequest = serde_json::from_value(json!({
            "operation": "StopRunningSensor",
            "jobOriginId": "o1",
            "jobSelectorId": "s1"
        }))
        .unwrap();
        assert_eq!(
            req,
            MutationRequest::StopRunningSensor {
                job_origin_id: "o1".into(),
                job_selector_id: "s1".into(),
            }
        );
        assert_eq!(operation_name(req.document()), Some("StopRunningSensor"));
    }

    #[test]
    fn rejected_response_has_no_data() {
        let value = serde_json::to_value(AgentResponse::rejected("bad")).unwrap();
        assert_eq!(value, json!({ "errors": [{ "message": "bad" }] }));
    }
}
