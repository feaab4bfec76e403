//! Integration tests for the orchestrator and statistics collection
//!
//! These tests drive complete runs from a configuration, either with a
//! scenario file or a generated network, and check the resulting report.

use rail_network_simulator::network::NetworkGenerator;
use rail_network_simulator::simulation::{SimulationError, SimulationOrchestrator, SimulationStatistics};
use rail_network_simulator::types::{SimulationConfig, TimeOfDay, TrainState};
use std::io::Write;

fn t(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

/// Two trains sharing one consist: 101 takes it from A to B, 202 brings it back
const SHUTTLE: &str = r#"{
    "connections": [
        { "train_number": 101, "origin": "A", "destination": "B",
          "departure": "08:00", "arrival": "09:00", "max_speed_kph": 100.0,
          "layout": ["ElectricLocomotive", "Coach"] },
        { "train_number": 202, "origin": "B", "destination": "A",
          "departure": "10:00", "arrival": "11:00", "max_speed_kph": 100.0,
          "layout": ["ElectricLocomotive", "Coach"] }
    ],
    "stations": [
        { "name": "A", "cars": [
            { "id": 1, "type": "ElectricLocomotive", "max_speed_kph": 160.0, "power_kw": 3000.0 },
            { "id": 5, "type": "Coach", "seats": 60, "internet": true }
        ] },
        { "name": "B", "cars": [] }
    ],
    "paths": [ { "point_a": "A", "point_b": "B", "distance_km": 100.0 } ]
}"#;

fn shuttle_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(SHUTTLE.as_bytes()).unwrap();
    file
}

fn shuttle_config(file: &tempfile::NamedTempFile) -> SimulationConfig {
    SimulationConfig {
        scenario: Some(file.path().to_string_lossy().into_owned()),
        end_time: t("12:00"),
        ..Default::default()
    }
}

/// Test a complete run of a scenario file and its statistics
#[test]
fn test_scenario_run_statistics() {
    let file = shuttle_file();
    let mut orchestrator = SimulationOrchestrator::new(shuttle_config(&file)).unwrap();
    assert!(!orchestrator.is_started());
    assert!(!orchestrator.is_finished());

    let records = orchestrator.run_to_completion().unwrap();
    assert_eq!(records.len(), 10);
    assert!(orchestrator.is_started());
    assert!(orchestrator.is_finished());

    // The return trip can only assemble once the first train is taken apart
    let second_assembly = records
        .iter()
        .find(|r| r.train.number.value() == 202 && r.train.state == TrainState::Assembled)
        .unwrap();
    assert_eq!(second_assembly.time, t("09:30"));

    let statistics = orchestrator.statistics().unwrap();
    assert_eq!(statistics.total_trains, 2);
    assert_eq!(statistics.finished_trains(), 2);
    assert_eq!(statistics.events_processed, 11);
    assert_eq!(statistics.train_records, 10);
    assert_eq!(statistics.total_departure_delay, 0);
    assert_eq!(statistics.total_arrival_delay, 0);
    assert!(statistics.non_departed_trains.is_empty());
    assert!(statistics.delayed_trains.is_empty());
    assert_eq!(statistics.delayed_percentage(), 0.0);
    assert_eq!(statistics.end_time, t("12:00"));

    let initial: Vec<(&str, usize)> = statistics
        .initial_cars
        .iter()
        .map(|c| (c.station.as_str(), c.cars))
        .collect();
    assert_eq!(initial, vec![("A", 2), ("B", 0)]);
    assert_eq!(statistics.final_cars, statistics.initial_cars);

    let report = statistics.generate_simplified_statistics_output();
    assert!(report.contains("   A = 2"));
    assert!(report.contains("Total arrival delay time: 00:00 (0 min)"));
    assert!(report.contains("FINISHED: 2"));
}

/// Test that a window too short for the return trip shows up in the report
#[test]
fn test_short_window_leaves_trains_behind() {
    let file = shuttle_file();
    let config = SimulationConfig {
        end_time: t("09:10"),
        ..shuttle_config(&file)
    };
    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    orchestrator.run_to_completion().unwrap();

    let statistics = orchestrator.statistics().unwrap();
    // Disassembly of 101 is high priority and still runs past the end
    assert_eq!(statistics.finished_trains(), 1);
    assert_eq!(statistics.trains_in_state(TrainState::NotAssembled), 1);
    assert_eq!(statistics.non_departed_trains.len(), 1);
    assert_eq!(statistics.non_departed_trains[0].number.value(), 202);
    assert_eq!(statistics.end_time, t("09:20"));
    assert!(statistics.generate_compact_summary().starts_with("2 trains"));
}

/// Test stepping through a run one event at a time
#[test]
fn test_step_through_events() {
    let file = shuttle_file();
    let mut orchestrator = SimulationOrchestrator::new(shuttle_config(&file)).unwrap();
    orchestrator.start().unwrap();
    assert_eq!(orchestrator.simulator().pending_events(), 2);

    let mut logged = Vec::new();
    while !orchestrator.is_finished() && orchestrator.simulator().pending_events() > 0 {
        if let Some(record) = orchestrator.run_next_event().unwrap() {
            logged.push(record);
        }
    }
    assert_eq!(logged.len(), 10);
    assert!(logged.windows(2).all(|pair| pair[0].time <= pair[1].time));
    assert_eq!(logged.last().unwrap().time, t("11:20"));
}

/// Test interval stepping returns each record exactly once, inside its window
#[test]
fn test_interval_windows() {
    let file = shuttle_file();
    let config = SimulationConfig {
        interval: 45,
        ..shuttle_config(&file)
    };
    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    orchestrator.start().unwrap();

    let mut total = 0;
    while !orchestrator.is_finished() {
        let from = orchestrator.current_time();
        let records = orchestrator.run_next_interval().unwrap();
        let to = orchestrator.current_time();
        assert_eq!(to.raw_time() - from.raw_time(), 45);
        assert!(records.iter().all(|r| r.time >= from && r.time < to));
        total += records.len();
    }
    assert_eq!(total, 10);
}

/// Test that starting twice is rejected
#[test]
fn test_double_start_is_rejected() {
    let file = shuttle_file();
    let mut orchestrator = SimulationOrchestrator::new(shuttle_config(&file)).unwrap();
    orchestrator.start().unwrap();
    assert!(matches!(
        orchestrator.start(),
        Err(SimulationError::InvalidOperation(_))
    ));
}

/// Test that a reset run repeats the first run exactly
#[test]
fn test_reset_repeats_run() {
    let file = shuttle_file();
    let mut orchestrator = SimulationOrchestrator::new(shuttle_config(&file)).unwrap();
    let first = orchestrator.run_to_completion().unwrap();

    orchestrator.reset().unwrap();
    assert!(!orchestrator.is_started());
    assert!(orchestrator.simulator().train_log().is_empty());
    assert_eq!(orchestrator.simulator().pending_events(), 0);

    let second = orchestrator.run_to_completion().unwrap();
    assert_eq!(first, second);
}

/// Test loading failures
#[test]
fn test_scenario_loading_errors() {
    let config = SimulationConfig {
        scenario: Some("/nonexistent/network.json".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        SimulationOrchestrator::new(config),
        Err(SimulationError::IoError(_))
    ));

    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(b"{ \"connections\": [").unwrap();
    let config = SimulationConfig {
        scenario: Some(file.path().to_string_lossy().into_owned()),
        ..Default::default()
    };
    assert!(matches!(
        SimulationOrchestrator::new(config),
        Err(SimulationError::SerializationError(_))
    ));
}

/// Test that a seed reproduces the generated network and its run
#[test]
fn test_seeded_generation_is_reproducible() {
    let config = SimulationConfig {
        seed: Some(2024),
        ..Default::default()
    };
    let first = NetworkGenerator::from_config(&config).generate(&config);
    let second = NetworkGenerator::from_config(&config).generate(&config);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(first.stations.len(), config.station_count);
    assert_eq!(first.connections.len(), config.train_count);

    let mut a = SimulationOrchestrator::new(config.clone()).unwrap();
    let mut b = SimulationOrchestrator::new(config).unwrap();
    assert_eq!(a.run_to_completion().unwrap(), b.run_to_completion().unwrap());
    assert_eq!(
        a.statistics().unwrap().total_arrival_delay,
        b.statistics().unwrap().total_arrival_delay
    );
}

/// Test that report and train log files are written and readable
#[test]
fn test_write_outputs() {
    let file = shuttle_file();
    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("report.json");
    let log_path = dir.path().join("trains.jsonl");

    let config = SimulationConfig {
        report_output: Some(report_path.to_string_lossy().into_owned()),
        train_log_output: Some(log_path.to_string_lossy().into_owned()),
        ..shuttle_config(&file)
    };
    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    orchestrator.run_to_completion().unwrap();
    orchestrator.write_outputs().unwrap();

    let report: SimulationStatistics =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report.total_trains, 2);
    assert_eq!(report.finished_trains(), 2);

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(log.lines().count(), 10);
    for line in log.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value.get("time").is_some());
        assert!(value.get("description").is_some());
    }
}
