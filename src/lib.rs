pub mod client;
pub mod config;
pub mod display;
pub mod documents;
pub mod error;
pub mod extract;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod types;

pub use client::SensorClient;
pub use display::{ErrorDisplay, TerminalAlert, display_sensor_mutation_errors};
pub use error::{ConfigError, ControlError, RegistryError, StructuredError};
pub use extract::extract_mutation_error;
pub use protocol::{AgentResponse, MutationRequest};
pub use registry::SensorRegistry;
pub use types::{
    InstigationState, InstigationStatus, MutationResponse, Sensor, SensorSelector,
    StartSensorResult, StopSensorMutationResult, StopSensorResult,
};

/// Address the agent listens on unless told otherwise.
pub const DEFAULT_AGENT_ADDR: &str = "127.0.0.1:1337";
