use std::{
    io::{BufRead, BufReader, Write},
    net::TcpStream,
    time::Duration,
};

use tracing::debug;

use crate::error::ControlError;
use crate::protocol::{AgentResponse, MutationRequest};
use crate::types::{MutationResponse, SensorSelector};

/// Blocking client for the sensor agent. Each call opens a fresh connection.
#[derive(Debug, Clone)]
pub struct SensorClient {
    addr: String,
    timeout: Option<Duration>,
}

impl SensorClient {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: None,
        }
    }

    /// Read/write timeout applied to each connection. Zero means none.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn start_sensor(&self, selector: &SensorSelector) -> Result<MutationResponse, ControlError> {
        self.send(&MutationRequest::StartSensor {
            sensor_selector: selector.clone(),
        })
    }

    pub fn stop_sensor(
        &self,
        job_origin_id: &str,
        job_selector_id: &str,
    ) -> Result<MutationResponse, ControlError> {
        self.send(&MutationRequest::StopRunningSensor {
            job_origin_id: job_origin_id.to_string(),
            job_selector_id: job_selector_id.to_string(),
        })
    }

    pub fn send(&self, req: &MutationRequest) -> Result<MutationResponse, ControlError> {
        let resp = self.round_trip(req)?;
        if !resp.errors.is_empty() {
            let messages: Vec<_> = resp.errors.into_iter().map(|e| e.message).collect();
            return Err(ControlError::Remote(messages.join("; ")));
        }
        resp.data.ok_or(ControlError::EmptyResponse)
    }

    fn round_trip(&self, req: &MutationRequest) -> Result<AgentResponse, ControlError> {
        let mut stream = TcpStream::connect(&self.addr).map_err(|source| ControlError::Connect {
            addr: self.addr.clone(),
            source,
        })?;
        stream.set_read_timeout(self.timeout)?;
        stream.set_write_timeout(self.timeout)?;

        debug!(addr = %self.addr, request = ?req, "sending mutation");
        let json = serde_json::to_string(req)?;
        stream.write_all(json.as_bytes())?;
        stream.write_all(b"\n")?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(ControlError::EmptyResponse);
        }

        let resp: AgentResponse = serde_json::from_str(&line)?;
        Ok(resp)
    }
}
