use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::SensorSelector;

/// Error payload produced by the agent when a mutation fails.
///
/// Carried inside a [`MutationResponse`](crate::MutationResponse) rather than
/// raised, so callers decide how to surface it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StructuredError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stack: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<StructuredError>>,
}

impl StructuredError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: Vec::new(),
            cause: None,
        }
    }

    pub fn with_stack<I, S>(mut self, stack: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stack = stack.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cause(mut self, cause: StructuredError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Iterates this error followed by each nested cause.
    pub fn chain(&self) -> impl Iterator<Item = &StructuredError> {
        std::iter::successors(Some(self), |e| e.cause.as_deref())
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StructuredError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|c| c as &(dyn std::error::Error + 'static))
    }
}

/// Lookup and state failures inside the sensor registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Could not find sensor {0}")]
    SensorNotFound(SensorSelector),

    #[error("Could not find sensor with origin id {origin_id} and selector id {selector_id}")]
    UnknownInstigator {
        origin_id: String,
        selector_id: String,
    },

    #[error("You have attempted to start sensor {0}, but it is already running")]
    AlreadyRunning(String),

    #[error("Sensor {0} is already registered")]
    Duplicate(String),
}

impl From<&RegistryError> for StructuredError {
    fn from(err: &RegistryError) -> Self {
        StructuredError::new(err.to_string())
    }
}

/// Failures between the client and the agent. These never reach the extractor.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("failed to reach agent at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed payload: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("agent closed the connection without a response")]
    EmptyResponse,

    #[error("agent rejected request: {0}")]
    Remote(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_walks_nested_causes() {
        let err = StructuredError::new("outer")
            .with_cause(StructuredError::new("middle").with_cause(StructuredError::new("inner")));
        let messages: Vec<_> = err.chain().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["outer", "middle", "inner"]);
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let err: StructuredError = serde_json::from_str(r#"{"message":"boom"}"#).unwrap();
        assert_eq!(err, StructuredError::new("boom"));
    }

    #[test]
    fn registry_error_keeps_message() {
        let err = RegistryError::AlreadyRunning("tick".into());
        let structured = StructuredError::from(&err);
        assert_eq!(
            structured.message,
            "You have attempted to start sensor tick, but it is already running"
        );
        assert!(structured.stack.is_empty());
        assert!(structured.cause.is_none());
    }
}
