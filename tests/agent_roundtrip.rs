use std::{
    io::{BufRead, BufReader, Write},
    net::{TcpListener, TcpStream},
    sync::Arc,
    thread,
    time::Duration,
};

use sensor_control::{
    ControlError, ErrorDisplay, InstigationStatus, SensorClient, SensorRegistry, SensorSelector,
    StartSensorResult, StopSensorResult, StructuredError, TerminalAlert,
    display_sensor_mutation_errors, extract_mutation_error, server,
};

fn selector() -> SensorSelector {
    SensorSelector::new("local", "toys", "toy_file_sensor")
}

fn spawn_agent() -> SensorClient {
    let registry = SensorRegistry::from_definitions([selector()]).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    thread::spawn(move || server::serve(listener, Arc::new(registry)));
    SensorClient::new(addr).with_timeout(Duration::from_secs(5))
}

#[test]
fn start_and_stop_over_the_wire() {
    let client = spawn_agent();

    let resp = client.start_sensor(&selector()).unwrap();
    assert!(extract_mutation_error(&resp).is_none());
    let Some(StartSensorResult::Sensor(sensor)) = resp.start_sensor else {
        panic!("expected Sensor variant");
    };
    assert_eq!(sensor.sensor_state.status, InstigationStatus::Running);

    let resp = client
        .stop_sensor(&sensor.id, &sensor.sensor_state.id)
        .unwrap();
    assert!(extract_mutation_error(&resp).is_none());
    let Some(StopSensorResult::StopSensorMutationResult(result)) = resp.stop_sensor else {
        panic!("expected StopSensorMutationResult variant");
    };
    assert_eq!(result.instigation_state.status, InstigationStatus::Stopped);
}

#[test]
fn domain_errors_reach_the_display() {
    let client = spawn_agent();
    client.start_sensor(&selector()).unwrap();

    let resp = client.start_sensor(&selector()).unwrap();
    let alert = TerminalAlert::new(Vec::new());
    assert!(display_sensor_mutation_errors(&resp, &alert));

    let text = String::from_utf8(alert.into_inner()).unwrap();
    assert!(text.starts_with("== Schedule Response ==\n"));
    assert!(text.contains("already running"));
}

#[test]
fn stop_with_unknown_ids_is_a_domain_error() {
    let client = spawn_agent();
    let resp = client.stop_sensor("nope", "nope").unwrap();
    let err = extract_mutation_error(&resp).unwrap();
    assert!(err.message.starts_with("Could not find sensor"));
}

#[test]
fn undecodable_request_is_a_transport_error() {
    let client = spawn_agent();

    let mut stream = TcpStream::connect(client.addr()).unwrap();
    stream.write_all(b"{\"operation\":\"Explode\"}\n").unwrap();
    let mut line = String::new();
    BufReader::new(stream).read_line(&mut line).unwrap();

    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert!(value.get("data").is_none());
    let message = value["errors"][0]["message"].as_str().unwrap();
    assert!(message.starts_with("Invalid Request"));
}

#[test]
fn non_utf8_request_is_a_transport_error() {
    let client = spawn_agent();

    let mut stream = TcpStream::connect(client.addr()).unwrap();
    stream.write_all(b"{\"operation\":\"\xff\xfe\"}\n").unwrap();
    let mut line = String::new();
    let read = BufReader::new(stream).read_line(&mut line).unwrap();
    assert!(read > 0, "agent closed the connection without replying");

    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert!(value.get("data").is_none());
    let message = value["errors"][0]["message"].as_str().unwrap();
    assert!(message.starts_with("Invalid Request"));
}

#[test]
fn zero_timeout_means_no_timeout() {
    let client = spawn_agent().with_timeout(Duration::ZERO);
    let resp = client.start_sensor(&selector()).unwrap();
    assert!(extract_mutation_error(&resp).is_none());
}

#[test]
fn unreachable_agent_is_a_connect_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };
    let err = SensorClient::new(addr)
        .start_sensor(&selector())
        .unwrap_err();
    assert!(matches!(err, ControlError::Connect { .. }));
}

struct CountingDisplay(std::cell::Cell<usize>);

impl ErrorDisplay for CountingDisplay {
    fn display_error(&self, _title: &str, _error: &StructuredError) {
        self.0.set(self.0.get() + 1);
    }
}

#[test]
fn successful_mutation_never_displays() {
    let client = spawn_agent();
    let resp = client.start_sensor(&selector()).unwrap();
    let display = CountingDisplay(std::cell::Cell::new(0));
    assert!(!display_sensor_mutation_errors(&resp, &display));
    assert_eq!(display.0.get(), 0);
}
