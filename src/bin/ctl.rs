use std::{process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sensor_control::{
    DEFAULT_AGENT_ADDR, MutationResponse, SensorClient, SensorSelector, StartSensorResult,
    StopSensorResult, TerminalAlert, config, display_sensor_mutation_errors,
};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Agent address
    #[arg(short, long, env = "SENSOR_AGENT_ADDR", default_value = DEFAULT_AGENT_ADDR)]
    addr: String,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = 3000, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a sensor
    Start {
        /// Repository location the sensor is loaded from
        #[arg(long)]
        location: String,
        /// Repository the sensor belongs to
        #[arg(long)]
        repository: String,
        /// Sensor name
        sensor: String,
    },
    /// Stop a running sensor
    Stop {
        /// Job origin id (the sensor id printed by `start`)
        #[arg(long)]
        origin_id: String,
        /// Job selector id (the sensor state id printed by `start`)
        #[arg(long)]
        selector_id: String,
    },
}

fn main() -> Result<ExitCode> {
    config::init_logging();
    let args = Args::parse();

    let client =
        SensorClient::new(&args.addr).with_timeout(Duration::from_millis(args.timeout_ms));

    let response = match &args.command {
        Command::Start {
            location,
            repository,
            sensor,
        } => client.start_sensor(&SensorSelector::new(location, repository, sensor)),
        Command::Stop {
            origin_id,
            selector_id,
        } => client.stop_sensor(origin_id, selector_id),
    }
    .with_context(|| format!("mutation against {} failed", client.addr()))?;

    if response.is_empty() {
        warn!("agent returned a response with no mutation result");
    }

    if display_sensor_mutation_errors(&response, &TerminalAlert::stderr()) {
        return Ok(ExitCode::FAILURE);
    }
    print_success(&response);
    Ok(ExitCode::SUCCESS)
}

fn print_success(response: &MutationResponse) {
    if let Some(StartSensorResult::Sensor(sensor)) = &response.start_sensor {
        println!(
            "Sensor {} is {} (state {})",
            sensor.id, sensor.sensor_state.status, sensor.sensor_state.id
        );
    }
    if let Some(StopSensorResult::StopSensorMutationResult(result)) = &response.stop_sensor {
        println!(
            "Sensor state {} is {}",
            result.instigation_state.id, result.instigation_state.status
        );
    }
}
