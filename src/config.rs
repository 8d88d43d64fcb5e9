use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;
use crate::types::SensorSelector;

/// Environment variable holding the tracing filter for both binaries.
pub const LOG_ENV: &str = "SENSOR_LOG";

/// Installs the global fmt subscriber, honouring `SENSOR_LOG` (default `info`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Reads sensor definitions from a JSON array of selectors.
pub fn load_definitions(path: &Path) -> Result<Vec<SensorSelector>, ConfigError> {
    let path_str = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_str.clone(),
        source,
    })?;
    let definitions: Vec<SensorSelector> =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path_str.clone(),
            source,
        })?;
    validate(&definitions)?;
    debug!(path = %path_str, count = definitions.len(), "loaded sensor definitions");
    Ok(definitions)
}

fn validate(definitions: &[SensorSelector]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for (idx, def) in definitions.iter().enumerate() {
        let fields = [
            ("repositoryLocationName", &def.repository_location_name),
            ("repositoryName", &def.repository_name),
            ("sensorName", &def.sensor_name),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "definition {idx}: {name} must not be empty"
                )));
            }
        }
        if !seen.insert(def) {
            return Err(ConfigError::Validation(format!(
                "definition {idx}: duplicate sensor {def}"
            )));
        }
    }
    Ok(())
}
