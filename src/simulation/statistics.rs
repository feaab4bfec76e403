//! Statistics collection and reporting
//!
//! A [`SimulationStatistics`] is a snapshot of a simulator taken at any point
//! of a run; usually at the end.

use crate::network::Station;
use crate::rolling_stock::TrainSnapshot;
use crate::simulation::{SimulationResult, Simulator};
use crate::types::{TimeOfDay, TrainState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Number of cars parked at a station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationCarCount {
    /// Station name
    pub station: String,
    /// Cars in the pool
    pub cars: usize,
}

/// Number of trains in one state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCount {
    /// Train state
    pub state: TrainState,
    /// Trains in that state
    pub trains: usize,
}

/// Summary of a simulation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationStatistics {
    /// Cars at every station before the first event
    pub initial_cars: Vec<StationCarCount>,
    /// Cars at every station when the statistics were taken
    pub final_cars: Vec<StationCarCount>,
    /// Number of trains in the timetable
    pub total_trains: usize,
    /// Sum of departure delays, in minutes
    pub total_departure_delay: i32,
    /// Sum of arrival delays, in minutes
    pub total_arrival_delay: i32,
    /// Simulator clock when the statistics were taken
    pub end_time: TimeOfDay,
    /// Events processed so far
    pub events_processed: usize,
    /// Train records logged so far
    pub train_records: usize,
    /// Trains per occupied state, in operational order
    pub trains_per_state: Vec<StateCount>,
    /// Trains that never left their origin
    pub non_departed_trains: Vec<TrainSnapshot>,
    /// Trains with a positive arrival delay
    pub delayed_trains: Vec<TrainSnapshot>,
    /// Wall-clock time spent simulating
    pub simulation_duration: Duration,
}

fn car_counts<'a>(stations: impl IntoIterator<Item = &'a Station>) -> Vec<StationCarCount> {
    stations
        .into_iter()
        .map(|station| StationCarCount {
            station: station.name().to_string(),
            cars: station.car_count(),
        })
        .collect()
}

impl SimulationStatistics {
    /// Gather statistics from `simulator`; `initial_stations` is the network
    /// as it was before the run
    pub fn collect(initial_stations: &[Station], simulator: &Simulator) -> SimulationResult<Self> {
        let dispatcher = simulator.dispatcher();

        let trains_per_state = TrainState::ALL
            .into_iter()
            .map(|state| StateCount {
                state,
                trains: dispatcher
                    .trains()
                    .iter()
                    .filter(|train| train.state() == state)
                    .count(),
            })
            .filter(|count| count.trains > 0)
            .collect();

        let snapshots = |numbers: Vec<_>| -> SimulationResult<Vec<TrainSnapshot>> {
            numbers
                .into_iter()
                .map(|nbr| Ok(dispatcher.view_train(nbr)?.snapshot()))
                .collect()
        };

        Ok(Self {
            initial_cars: car_counts(initial_stations),
            final_cars: car_counts(dispatcher.stations()),
            total_trains: dispatcher.trains().len(),
            total_departure_delay: dispatcher.total_departure_delay().raw_time(),
            total_arrival_delay: dispatcher.total_arrival_delay().raw_time(),
            end_time: simulator.current_time(),
            events_processed: simulator.processed_events(),
            train_records: simulator.train_log().len(),
            trains_per_state,
            non_departed_trains: snapshots(dispatcher.non_departed_trains())?,
            delayed_trains: snapshots(dispatcher.delayed_trains())?,
            simulation_duration: Duration::ZERO,
        })
    }

    /// Record the wall-clock time of the run
    pub fn set_simulation_duration(&mut self, duration: Duration) {
        self.simulation_duration = duration;
    }

    /// Trains currently in `state`
    pub fn trains_in_state(&self, state: TrainState) -> usize {
        self.trains_per_state
            .iter()
            .find(|count| count.state == state)
            .map_or(0, |count| count.trains)
    }

    /// Trains that reached the Finished state
    pub fn finished_trains(&self) -> usize {
        self.trains_in_state(TrainState::Finished)
    }

    /// Share of trains arriving late, in percent
    pub fn delayed_percentage(&self) -> f64 {
        if self.total_trains == 0 {
            0.0
        } else {
            (self.delayed_trains.len() as f64 / self.total_trains as f64) * 100.0
        }
    }

    /// Average arrival delay over the delayed trains, in minutes
    pub fn average_arrival_delay(&self) -> f64 {
        if self.delayed_trains.is_empty() {
            0.0
        } else {
            self.total_arrival_delay as f64 / self.delayed_trains.len() as f64
        }
    }

    /// Readable multi-section report
    pub fn generate_simplified_statistics_output(&self) -> String {
        let mut output = String::new();

        output.push_str("Rail Network Simulation Complete!\n");
        output.push_str("=================================\n\n");

        output.push_str("Number of vehicles at start of simulation:\n");
        output.push_str("-----------------------------------------\n");
        for count in &self.initial_cars {
            output.push_str(&format!("   {} = {}\n", count.station, count.cars));
        }
        output.push('\n');

        output.push_str("Time information:\n");
        output.push_str("----------------\n");
        output.push_str(&format!(
            "   Total departure delay time: {} ({} min)\n",
            TimeOfDay::from_minutes(self.total_departure_delay),
            self.total_departure_delay
        ));
        output.push_str(&format!(
            "   Total arrival delay time: {} ({} min)\n",
            TimeOfDay::from_minutes(self.total_arrival_delay),
            self.total_arrival_delay
        ));
        output.push_str(&format!("   End time for simulation: {}\n\n", self.end_time));

        output.push_str("Trains by state:\n");
        output.push_str("---------------\n");
        for count in &self.trains_per_state {
            output.push_str(&format!("   {}: {}\n", count.state, count.trains));
        }
        output.push('\n');

        output.push_str("Trains that never left the station:\n");
        output.push_str("----------------------------------\n");
        for train in &self.non_departed_trains {
            output.push_str(&format!("   {}\n", train));
        }
        output.push('\n');

        output.push_str("Delayed trains:\n");
        output.push_str("--------------\n");
        for train in &self.delayed_trains {
            output.push_str(&format!("   {}\n", train));
        }
        output.push('\n');

        if self.simulation_duration > Duration::ZERO {
            output.push_str(&format!(
                "Processed {} events in {:.3} seconds\n\n",
                self.events_processed,
                self.simulation_duration.as_secs_f64()
            ));
        }

        output.push_str("Summary: ");
        output.push_str(&self.generate_compact_summary());
        output.push('\n');
        output
    }

    /// One-line summary suitable for logging
    pub fn generate_compact_summary(&self) -> String {
        format!(
            "{} trains ({} finished, {} never departed, {} delayed), {} events, {} records, ended {}",
            self.total_trains,
            self.finished_trains(),
            self.non_departed_trains.len(),
            self.delayed_trains.len(),
            self.events_processed,
            self.train_records,
            self.end_time
        )
    }

    /// Write the statistics as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> SimulationResult<()> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Saved simulation statistics to {}", path.display());
        Ok(())
    }
}

impl fmt::Display for SimulationStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generate_simplified_statistics_output())
    }
}
