use std::{net::TcpListener, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use sensor_control::{DEFAULT_AGENT_ADDR, SensorRegistry, config, server};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Serves start/stop sensor mutations", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(short, long, env = "SENSOR_AGENT_ADDR", default_value = DEFAULT_AGENT_ADDR)]
    addr: String,

    /// JSON file listing sensor definitions
    #[arg(short, long, env = "SENSOR_DEFINITIONS")]
    definitions: Option<PathBuf>,
}

fn main() -> Result<()> {
    config::init_logging();
    let args = Args::parse();

    let definitions = match &args.definitions {
        Some(path) => config::load_definitions(path)?,
        None => {
            warn!("no sensor definitions given, starting with an empty registry");
            Vec::new()
        }
    };

    let registry = SensorRegistry::new();
    for selector in definitions {
        let origin_id = registry.register(selector.clone())?;
        if let Some((_, state)) = registry.lookup(&selector) {
            // ctl needs both ids to stop a sensor
            info!(
                sensor = %selector,
                job_origin_id = %origin_id,
                job_selector_id = %state.id,
                "registered sensor"
            );
        }
    }

    let listener =
        TcpListener::bind(&args.addr).with_context(|| format!("binding {}", args.addr))?;
    server::serve(listener, Arc::new(registry))
}
