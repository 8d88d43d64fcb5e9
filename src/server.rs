use std::{
    io::{BufRead, BufReader, Write},
    net::{TcpListener, TcpStream},
    sync::Arc,
    thread,
};

use anyhow::Result;
use tracing::{debug, error, info};

use crate::documents::operation_name;
use crate::protocol::{AgentResponse, MutationRequest};
use crate::registry::SensorRegistry;
use crate::types::MutationResponse;

/// Accepts connections forever, serving each on its own thread.
pub fn serve(listener: TcpListener, registry: Arc<SensorRegistry>) -> Result<()> {
    info!(addr = %listener.local_addr()?, sensors = registry.len(), "agent listening");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    if let Err(e) = handle_client(&mut stream, &registry) {
                        error!(error = ?e, "error handling client");
                    }
                });
            }
            Err(e) => error!(error = %e, "connection failed"),
        }
    }
    Ok(())
}

fn handle_client(stream: &mut TcpStream, registry: &SensorRegistry) -> Result<()> {
    debug!(peer = ?stream.peer_addr().ok(), "accepted connection");

    let mut reader = BufReader::new(stream.try_clone()?);
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;

    if line.trim_ascii().is_empty() {
        return Ok(());
    }

    // Raw bytes so invalid UTF-8 is rejected like any other bad payload.
    let response = match serde_json::from_slice::<MutationRequest>(&line) {
        Ok(req) => AgentResponse::data(execute(registry, &req)),
        Err(e) => AgentResponse::rejected(format!("Invalid Request: {e}")),
    };

    let resp_json = serde_json::to_string(&response)?;
    stream.write_all(resp_json.as_bytes())?;
    stream.write_all(b"\n")?;

    Ok(())
}

/// Runs one mutation against the registry.
pub fn execute(registry: &SensorRegistry, req: &MutationRequest) -> MutationResponse {
    debug!(
        operation = operation_name(req.document()).unwrap_or("unknown"),
        "executing mutation"
    );
    match req {
        MutationRequest::StartSensor { sensor_selector } => registry.start_sensor(sensor_selector),
        MutationRequest::StopRunningSensor {
            job_origin_id,
            job_selector_id,
        } => registry.stop_sensor(job_origin_id, job_selector_id),
    }
}
