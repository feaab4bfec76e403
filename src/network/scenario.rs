//! Scenario files
//!
//! A [`Scenario`] is the loaded form of a rail network: the timetable, the
//! stations with their initial car pools, and the track map. Scenarios are
//! stored as JSON.
//!
//! ```json
//! {
//!   "connections": [
//!     { "train_number": 101, "origin": "A", "destination": "B",
//!       "departure": "08:00", "arrival": "09:00", "max_speed_kph": 100.0,
//!       "layout": ["ElectricLocomotive", "Coach"] }
//!   ],
//!   "stations": [
//!     { "name": "A", "cars": [
//!       { "id": 1, "type": "ElectricLocomotive", "max_speed_kph": 160.0, "power_kw": 3000.0 },
//!       { "id": 5, "type": "Coach", "seats": 60, "internet": true } ] },
//!     { "name": "B", "cars": [] }
//!   ],
//!   "paths": [ { "point_a": "A", "point_b": "B", "distance_km": 100.0 } ]
//! }
//! ```

use super::{Connection, Path, Station, TrainDispatcher};
use crate::simulation::SimulationResult;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::info;

/// Timetable, stations and track map of one network
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// One timetable entry per train
    #[serde(default)]
    pub connections: Vec<Connection>,
    /// Stations with their initial cars
    #[serde(default)]
    pub stations: Vec<Station>,
    /// Track map
    #[serde(default)]
    pub paths: Vec<Path>,
}

impl Scenario {
    /// Create a scenario from its parts
    pub fn new(connections: Vec<Connection>, stations: Vec<Station>, paths: Vec<Path>) -> Self {
        Self {
            connections,
            stations,
            paths,
        }
    }

    /// Parse a scenario from JSON text
    pub fn from_json(json: &str) -> SimulationResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scenario from a JSON file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> SimulationResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let scenario = Self::from_json(&content)?;
        info!(
            "Loaded scenario from {}: {} connections, {} stations, {} paths",
            path.display(),
            scenario.connections.len(),
            scenario.stations.len(),
            scenario.paths.len()
        );
        Ok(scenario)
    }

    /// Write the scenario as pretty-printed JSON
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> SimulationResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Total number of cars across all stations
    pub fn car_count(&self) -> usize {
        self.stations.iter().map(Station::car_count).sum()
    }

    /// Build a dispatcher from a copy of this scenario
    pub fn to_dispatcher(&self) -> SimulationResult<TrainDispatcher> {
        self.clone().into_dispatcher()
    }

    /// Build a dispatcher, consuming the scenario
    pub fn into_dispatcher(self) -> SimulationResult<TrainDispatcher> {
        TrainDispatcher::new(self.connections, self.stations, self.paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulationError;
    use crate::types::{CarId, TrainNumber};

    const SCENARIO: &str = r#"{
        "connections": [
            { "train_number": 101, "origin": "A", "destination": "B",
              "departure": "08:00", "arrival": "09:00", "max_speed_kph": 100.0,
              "layout": ["ElectricLocomotive", "Coach"] }
        ],
        "stations": [
            { "name": "A", "cars": [
                { "id": 5, "type": "Coach", "seats": 60, "internet": true },
                { "id": 1, "type": "ElectricLocomotive", "max_speed_kph": 160.0, "power_kw": 3000.0 }
            ] },
            { "name": "B" }
        ],
        "paths": [ { "point_a": "A", "point_b": "B", "distance_km": 100.0 } ]
    }"#;

    #[test]
    fn test_parse_and_build_dispatcher() {
        let scenario = Scenario::from_json(SCENARIO).unwrap();
        assert_eq!(scenario.connections.len(), 1);
        assert_eq!(scenario.car_count(), 2);

        let dispatcher = scenario.to_dispatcher().unwrap();
        assert_eq!(dispatcher.train_numbers(), vec![TrainNumber(101)]);
        assert_eq!(dispatcher.car_location(CarId(1)).unwrap(), "A");
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let err = Scenario::from_json("{ \"connections\": 5 }").unwrap_err();
        assert!(matches!(err, SimulationError::SerializationError(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Scenario::from_file("/no/such/scenario.json").unwrap_err();
        assert!(matches!(err, SimulationError::IoError(_)));
    }

    #[test]
    fn test_save_and_reload() {
        use tempfile::Builder;

        let temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        let scenario = Scenario::from_json(SCENARIO).unwrap();
        scenario.save_to_file(temp_file.path()).unwrap();

        let reloaded = Scenario::from_file(temp_file.path()).unwrap();
        assert_eq!(reloaded.connections, scenario.connections);
        assert_eq!(reloaded.paths, scenario.paths);
        assert_eq!(reloaded.car_count(), 2);
    }
}
